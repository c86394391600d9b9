use crate::domain::constants::HTML_CONTENT_TYPE;
use crate::domain::models::MailConfig;
use crate::error::JobError;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Html,
    Plain,
}

/// One outbound message whose body is read from a file.
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body_path: PathBuf,
    pub content_type: ContentType,
}

impl MailMessage {
    pub fn recipients_joined(&self) -> String {
        self.recipients.join(",")
    }
}

pub trait Mailer {
    fn send(&self, message: &MailMessage) -> Result<(), JobError>;
}

/// Sends mail through a `mail`/`mailx`-compatible command, body on stdin.
#[derive(Debug, Clone)]
pub struct CommandMailer {
    command: Vec<String>,
    html_header_flag: String,
}

impl CommandMailer {
    pub fn from_config(cfg: &MailConfig) -> Self {
        Self {
            command: cfg.command.clone(),
            html_header_flag: cfg.html_header_flag.clone(),
        }
    }

    pub fn args(&self, message: &MailMessage) -> Vec<String> {
        let mut args: Vec<String> = self.command.iter().skip(1).cloned().collect();
        if message.content_type == ContentType::Html {
            args.push(self.html_header_flag.clone());
            args.push(HTML_CONTENT_TYPE.to_string());
        }
        args.push("-s".to_string());
        args.push(message.subject.clone());
        args.push(message.recipients_joined());
        args
    }
}

impl Mailer for CommandMailer {
    fn send(&self, message: &MailMessage) -> Result<(), JobError> {
        let dispatch_err = |detail: String| JobError::MailDispatch {
            recipients: message.recipients_joined(),
            detail,
        };
        let program = self
            .command
            .first()
            .ok_or_else(|| dispatch_err("mail command is empty".to_string()))?;
        let body = open_body(&message.body_path).map_err(dispatch_err)?;

        tracing::info!(
            recipients = %message.recipients_joined(),
            subject = %message.subject,
            "sending mail"
        );
        let out = Command::new(program)
            .args(self.args(message))
            .stdin(Stdio::from(body))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| dispatch_err(format!("cannot run {}: {}", program, e)))?;

        if out.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&out.stderr);
        let stderr = stderr.trim();
        Err(dispatch_err(if stderr.is_empty() {
            format!("{} exited with {}", program, out.status)
        } else {
            format!("{} exited with {}: {}", program, out.status, stderr)
        }))
    }
}

fn open_body(path: &Path) -> Result<File, String> {
    File::open(path).map_err(|e| format!("cannot open body {}: {}", path.display(), e))
}
