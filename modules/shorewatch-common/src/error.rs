use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShorewatchError {
    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
