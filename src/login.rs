use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Usable bytes in a login line; a 256-byte buffer minus its terminator.
pub const MAX_LOGIN_BYTES: usize = 255;

/// Read one login line from `reader` as raw bytes.
///
/// At most [`MAX_LOGIN_BYTES`] are consumed. Anything past that limit stays
/// unread. EOF before any data yields an empty login.
pub async fn read_login<R>(reader: &mut R) -> Result<Vec<u8>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::with_capacity(MAX_LOGIN_BYTES);
    reader
        .take(MAX_LOGIN_BYTES as u64)
        .read_until(b'\n', &mut line)
        .await
        .context("failed to read login")?;
    Ok(normalize_login(&line).to_vec())
}

/// Apply the line rules to a raw buffer: cap at [`MAX_LOGIN_BYTES`], drop the
/// first newline and everything after it, then stop at the first NUL byte.
///
/// Only `\n` is stripped; a trailing `\r` or spaces are part of the login.
pub fn normalize_login(line: &[u8]) -> &[u8] {
    let line = &line[..line.len().min(MAX_LOGIN_BYTES)];
    let line = match line.iter().position(|&b| b == b'\n') {
        Some(end) => &line[..end],
        None => line,
    };
    match line.iter().position(|&b| b == 0) {
        Some(end) => &line[..end],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_exactly_one_newline() {
        assert_eq!(normalize_login(b"levelsix\n"), b"levelsix");
        assert_eq!(normalize_login(b"levelsix"), b"levelsix");
        assert_eq!(normalize_login(b"levelsix\r\n"), b"levelsix\r");
        assert_eq!(normalize_login(b"  pad  \n"), b"  pad  ");
        assert_eq!(normalize_login(b"\n"), b"");
    }

    #[test]
    fn stops_at_nul() {
        assert_eq!(normalize_login(b"abcd\0efgh\n"), b"abcd");
    }

    #[test]
    fn caps_long_lines() {
        let long = vec![b'a'; 400];
        assert_eq!(normalize_login(&long).len(), MAX_LOGIN_BYTES);
    }

    #[tokio::test]
    async fn reads_single_line() {
        let mut input: &[u8] = b"abcd\nsecond line\n";
        let login = read_login(&mut input).await.expect("read login");
        assert_eq!(login, b"abcd");
        assert_eq!(input, b"second line\n");
    }

    #[tokio::test]
    async fn leaves_overflow_unread() {
        let mut raw = vec![b'z'; MAX_LOGIN_BYTES];
        raw.extend_from_slice(b"tail\n");
        let mut input: &[u8] = &raw;
        let login = read_login(&mut input).await.expect("read login");
        assert_eq!(login.len(), MAX_LOGIN_BYTES);
        assert_eq!(input, b"tail\n");
    }

    #[tokio::test]
    async fn empty_on_eof() {
        let mut input: &[u8] = b"";
        let login = read_login(&mut input).await.expect("read login");
        assert!(login.is_empty());
    }
}
