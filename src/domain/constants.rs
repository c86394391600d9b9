/// Subject of the report mail sent to the distribution list.
pub const REPORT_SUBJECT: &str = "ArcLink Request Log Report";

/// Subject of the diagnostics mail sent to the maintainer.
pub const STATUS_SUBJECT: &str = "EIDA webreqlog report";

pub const HTML_CONTENT_TYPE: &str = "Content-Type: text/html";

pub const CONFIG_RELATIVE_PATH: &str = ".config/reqlog-job/config.toml";

/// Lines of reporter stderr carried into a failure message.
pub const DIAGNOSTICS_TAIL_LINES: usize = 20;
