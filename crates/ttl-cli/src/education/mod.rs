//! Educational features: explanations of what each command touches.

use colored::Colorize;
use std::path::Path;

/// Command explanation builder.
pub struct Explain {
    description: String,
    files: Vec<String>,
    needs_root: bool,
    what_happens: Vec<String>,
}

impl Explain {
    fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            files: Vec::new(),
            needs_root: false,
            what_happens: Vec::new(),
        }
    }

    fn file(mut self, path: &Path) -> Self {
        self.files.push(path.display().to_string());
        self
    }

    fn root(mut self) -> Self {
        self.needs_root = true;
        self
    }

    fn step(mut self, step: &str) -> Self {
        self.what_happens.push(step.to_string());
        self
    }

    /// Print the explanation to stdout.
    pub fn print(&self) {
        println!();
        println!("{}", "=== What This Does ===".bold().cyan());
        println!("{}", self.description);
        println!();

        if !self.what_happens.is_empty() {
            println!("{}", "How it works:".bold());
            for (i, step) in self.what_happens.iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
            println!();
        }

        for file in &self.files {
            println!("{} {}", "File:".bold(), file.dimmed());
        }

        let privilege = if self.needs_root {
            "root (via the configured privilege mode)".yellow().to_string()
        } else {
            "none".green().to_string()
        };
        println!("{} {}", "Privilege:".bold(), privilege);

        println!();
        println!("{}", "=== Results ===".bold().cyan());
        println!();
    }

    // ========================================================================
    // Factory methods for each command
    // ========================================================================

    pub fn get(proc_path: &Path) -> Self {
        Self::new("Shows the TTL the kernel currently stamps on outgoing IPv4 packets.")
            .file(proc_path)
            .step("Reads the kernel control file")
            .step("Reports 'unknown' (-1 in JSON) if it can't be read")
    }

    pub fn set(value: i64, proc_path: &Path) -> Self {
        Self::new(&format!(
            "Sets the default IPv4 TTL to {value}. Every hop decrements the TTL, so \
             carriers compare it against the OS default to spot tethered devices."
        ))
        .file(proc_path)
        .root()
        .step("Rejects values outside 32-128 without touching anything")
        .step("Writes the new value to the kernel control file")
        .step("Reads it back; the change only counts if the kernel reports it")
        .step("Takes effect immediately, but is lost on reboot (see 'persist')")
    }

    pub fn check(proc_path: &Path) -> Self {
        Self::new("Checks whether the live TTL is 65, the carrier evasion value.")
            .file(proc_path)
            .step("A read failure counts as 'no'")
    }

    pub fn persist(value: i64, conf_path: &Path, reload: bool) -> Self {
        let explain = Self::new(&format!(
            "Records TTL {value} in the boot-time sysctl configuration so it survives reboots."
        ))
        .file(conf_path)
        .root()
        .step("Loads the file (a missing file counts as empty)")
        .step("Removes any previous net.ipv4.ip_default_ttl entries")
        .step("Appends a single new entry; all other lines are kept as they are")
        .step("Writes the whole file back");

        if reload {
            explain.step("Runs 'sysctl -p' so the kernel applies it now")
        } else {
            explain.step("The live value is unchanged until reboot or 'sysctl -p'")
        }
    }

    pub fn persistent(conf_path: &Path) -> Self {
        Self::new("Shows the TTL that will apply after the next reboot.")
            .file(conf_path)
            .step("Scans the file for net.ipv4.ip_default_ttl")
            .step("A missing file or entry means 'not persistent'")
    }

    pub fn status(proc_path: &Path, conf_path: &Path) -> Self {
        Self::new("Shows the live and persisted TTL side by side.")
            .file(proc_path)
            .file(conf_path)
    }
}
