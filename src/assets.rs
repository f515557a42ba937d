use rust_embed::RustEmbed;

/// Front-end files and the bundled catalog, compiled into the binary.
#[derive(RustEmbed)]
#[folder = "frontend/"]
pub struct Asset;
