/// Journal logger that lets this crate through at info (debug when toggled)
/// and everything else at warn.
struct FilteredJournal {
    inner: systemd_journal_logger::JournalLog,
}

fn is_own_target(target: &str) -> bool {
    target.starts_with("compass")
}

fn max_level_for(target: &str) -> log::LevelFilter {
    if is_own_target(target) {
        if crate::debug_logging() {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    } else {
        log::LevelFilter::Warn
    }
}

impl log::Log for FilteredJournal {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= max_level_for(metadata.target())
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the journal logger (`journalctl --user -t <identifier> -f`).
pub fn init(identifier: &str, debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    let journal = systemd_journal_logger::JournalLog::new()?
        .with_syslog_identifier(identifier.to_string());

    crate::set_debug_logging(debug);

    log::set_boxed_logger(Box::new(FilteredJournal { inner: journal }))?;
    // Global max must be Debug so compass debug logs can pass through when toggled
    log::set_max_level(log::LevelFilter::Debug);
    Ok(())
}
