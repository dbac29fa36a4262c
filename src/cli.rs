use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Serve files from a directory over HTTP/1.0 and HTTP/1.1.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory whose files are served; `/` maps to its index.html
    #[arg(long = "document-root", alias = "document_root", value_name = "PATH")]
    pub document_root: Option<PathBuf>,

    /// Port to listen on (all interfaces)
    #[arg(long)]
    pub port: Option<u16>,

    /// YAML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parses the process arguments, also accepting the single-dash
    /// `-document_root <path> -port <port>` form.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args_os()))
    }

    /// Command-line values take precedence over everything in `cfg`.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(root) = &self.document_root {
            cfg.static_files.document_root = root.clone();
        }
        if let Some(port) = self.port {
            cfg.server.listen_addr = format!("0.0.0.0:{port}");
        }
    }
}

pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-document_root") => OsString::from("--document-root"),
            Some("-port") => OsString::from("--port"),
            _ => arg,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(normalize_legacy_flags(args.iter().map(OsString::from)))
    }

    #[test]
    fn legacy_flags() {
        let args = parse(&["docroot", "-document_root", "/srv/www", "-port", "9000"]);
        assert_eq!(args.document_root, Some(PathBuf::from("/srv/www")));
        assert_eq!(args.port, Some(9000));
    }

    #[test]
    fn cli_overrides_config() {
        let args = parse(&["docroot", "--document-root", "/tmp/site", "--port", "8081"]);
        let mut cfg = Config::default();
        args.apply(&mut cfg);

        assert_eq!(cfg.static_files.document_root, PathBuf::from("/tmp/site"));
        assert_eq!(cfg.server.listen_addr, "0.0.0.0:8081");
    }

    #[test]
    fn no_flags_leave_config_alone() {
        let args = parse(&["docroot"]);
        let mut cfg = Config::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
    }
}
