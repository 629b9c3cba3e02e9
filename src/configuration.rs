#[derive(Clone)]
pub struct Configuration {
    pub data_dir: String,
    pub api_secret: Option<String>,
    pub log_file: Option<String>,
    pub reset: bool,
}
