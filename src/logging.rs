//! Log setup: every record goes to stderr and to an on-disk GL log.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Env, Target};

/// Started fresh once per run; entries are only ever appended after that.
pub const GL_LOG_FILE: &str = "gl.log";

/// Forwards each formatted record to stderr and then to the log file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Installs the global logger. Call once, before anything logs.
///
/// Filtering defaults to `info` and follows `RUST_LOG` when set.
pub fn init(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(Tee { file })))
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn tee_appends_records_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gl.log");
        let mut tee = Tee {
            file: File::create(&path).unwrap(),
        };
        tee.write_all(b"compiled vertex shader, index 1\n").unwrap();
        tee.write_all(b"linked shader program 3\n").unwrap();
        tee.flush().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "compiled vertex shader, index 1\nlinked shader program 3\n"
        );
    }
}
