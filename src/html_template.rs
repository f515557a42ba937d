use axum::response::Html;

use crate::menu::Menu;
use crate::utils::escape_html;

pub fn get_map_html(menu: &Menu) -> Html<String> {
    let html = MAP_HTML.replace("<!-- MOVIE_MENU_PLACEHOLDER -->", &render_movie_menu(menu));
    Html(html)
}

/// Menu markup; each node carries its movie id so clicks never depend on DOM positions.
pub fn render_movie_menu(menu: &Menu) -> String {
    if menu.entries().is_empty() {
        return r#"<li class="movies__empty">No movies loaded</li>"#.to_string();
    }

    menu.entries()
        .iter()
        .map(|entry| {
            let id = entry.id.0;
            format!(
                r#"<li>
        <ul class="movie" data-movie="{id}">
          <li><h2 class="movie__title" data-movie="{id}">{title}</h2></li>
          <li><ul class="movie__locations" data-movie="{id}"></ul></li>
        </ul>
      </li>"#,
                id = id,
                title = escape_html(&entry.title)
            )
        })
        .collect::<Vec<_>>()
        .join("\n      ")
}

// HTML template for the map page
const MAP_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>MovieMap - Filming Locations</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <link rel="stylesheet" href="/style.css" />
</head>
<body>
    <aside class="sidebar">
        <h1 class="sidebar__heading">Movies</h1>
        <div class="notice" hidden></div>
        <ul class="movies">
      <!-- MOVIE_MENU_PLACEHOLDER -->
        </ul>
    </aside>
    <div id="map"></div>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script src="/script.js"></script>
</body>
</html>
"#;
