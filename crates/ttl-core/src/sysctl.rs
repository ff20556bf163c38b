//! Line-preserving editor for `sysctl.conf`-style documents.
//!
//! The file is shared with unrelated settings, so everything except the
//! lines this crate owns is kept byte-for-byte and in order.

use crate::types::Ttl;

/// Sysctl key for the default IPv4 TTL
pub const TTL_KEY: &str = "net.ipv4.ip_default_ttl";

/// Comment line written directly above the TTL entry
pub const MARKER_COMMENT: &str = "# Set by ttl-changer";

/// A parsed `sysctl.conf` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SysctlConf {
    lines: Vec<String>,
}

impl SysctlConf {
    /// Parse a document. Line contents (including any `\r`) are kept verbatim.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.split_terminator('\n').map(str::to_string).collect(),
        }
    }

    /// Returns the document lines, without terminators
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns true if the document has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Value of the last entry for `key`, as `sysctl -p` would apply it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .filter_map(|line| parse_entry(line))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Value of the persisted TTL entry, if any
    #[must_use]
    pub fn ttl_entry(&self) -> Option<&str> {
        self.get(TTL_KEY)
    }

    /// Number of lines that would be removed by [`SysctlConf::remove_key`].
    #[must_use]
    pub fn count_key(&self, key: &str) -> usize {
        self.lines.iter().filter(|l| owns_line(l, key)).count()
    }

    /// Remove every line whose trimmed content starts with `key`.
    ///
    /// Returns the number of lines removed.
    pub fn remove_key(&mut self, key: &str) -> usize {
        let before = self.lines.len();
        self.lines.retain(|l| !owns_line(l, key));
        before - self.lines.len()
    }

    /// Replace any TTL entry with a single entry at the end of the document.
    ///
    /// A marker comment is dropped only when it sits directly above a removed
    /// TTL line; a marker anywhere else is an ordinary line.
    pub fn set_ttl(&mut self, ttl: Ttl) {
        let mut kept = Vec::with_capacity(self.lines.len() + 2);
        let mut lines = std::mem::take(&mut self.lines).into_iter().peekable();
        while let Some(line) = lines.next() {
            if owns_line(&line, TTL_KEY) {
                continue;
            }
            let marks_entry = line.trim() == MARKER_COMMENT
                && lines.peek().is_some_and(|next| owns_line(next, TTL_KEY));
            if !marks_entry {
                kept.push(line);
            }
        }
        kept.push(MARKER_COMMENT.to_string());
        kept.push(format!("{TTL_KEY} = {ttl}"));
        self.lines = kept;
    }

    /// Serialize back to text, one `\n`-terminated line per entry.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

fn owns_line(line: &str, key: &str) -> bool {
    line.trim().starts_with(key)
}

/// Split a `key = value` line. Comments (`#`, `;`) and blank lines yield
/// `None`; a leading `-` (ignore-failure prefix) is stripped from the key.
fn parse_entry(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let key = key.trim().trim_start_matches('-');
    Some((key, value.trim()))
}
