use askama::Template;
use drugsmiles::report::ReportRow;

#[derive(Template)]
#[template(path = "index.html")]
pub(crate) struct Index {
    pub(crate) output: String,
}

#[derive(Template)]
#[template(path = "results.html")]
pub(crate) struct Results {
    pub(crate) rows: Vec<ReportRow>,
    pub(crate) warnings: Vec<String>,
    pub(crate) processed: usize,
    pub(crate) error: Option<String>,
    /// id of the stored CSV, when one was produced
    pub(crate) download: Option<usize>,
    pub(crate) output: String,
}

impl Results {
    pub(crate) fn failed(error: impl ToString, output: &str) -> Self {
        Self {
            rows: Vec::new(),
            warnings: Vec::new(),
            processed: 0,
            error: Some(error.to_string()),
            download: None,
            output: output.to_owned(),
        }
    }
}
