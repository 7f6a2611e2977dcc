//! Sample CSV for manual Instagram imports

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const FILE_NAME: &str = "instagram_import_template.csv";

pub const TEMPLATE: &str = r#"caption,image_url,post_url,hashtags
"Sample Instagram post caption with #hashtags #example","https://example.com/image1.jpg","https://www.instagram.com/p/ABC123/","hashtags,example"
"Another sample post for Example Business #example_business #signs","https://example.com/image2.jpg","https://www.instagram.com/p/DEF456/","example_business,signs""#;

/// Write the template into `dir`, replacing any previous copy
pub fn write_template(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(FILE_NAME);
    std::fs::write(&path, TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
