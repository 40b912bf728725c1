use std::{
    io::{self, Write},
    time::Duration,
};

use shadowtrace_monitor::{MonitorObserver, MonitorReport, RoundOutcome};

use super::{ColorChoice, Tone, paint};

/// Prints monitoring progress as it happens, one block per round.
pub struct HumanMonitorPrinter<W: Write> {
    out: W,
    use_color: bool,
    failed: Option<io::Error>,
}

impl<W: Write> HumanMonitorPrinter<W> {
    pub fn new(out: W, color: ColorChoice) -> Self {
        Self {
            out,
            use_color: color == ColorChoice::Always,
            failed: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_round(&mut self, outcome: &RoundOutcome) -> io::Result<()> {
        let c = self.use_color;

        if let Some(changes) = &outcome.changes {
            let groups = [
                ("Added files", '+', Tone::Added, &changes.added),
                ("Deleted files", '-', Tone::Deleted, &changes.deleted),
                ("Modified files", '~', Tone::Modified, &changes.modified),
            ];
            for (label, mark, tone, records) in groups {
                if records.is_empty() {
                    continue;
                }
                writeln!(self.out, "{}", paint(c, tone, &format!("{label}: {}", records.len())))?;
                for r in records.iter() {
                    writeln!(self.out, "{}", paint(c, tone, &format!("   {mark} {}", r.full_path)))?;
                }
            }
        }

        if outcome.anomalies.is_empty() {
            writeln!(self.out, "{}", paint(c, Tone::Ok, "No anomalies detected in this scan"))
        } else {
            let header = format!("ANOMALIES DETECTED: {}", outcome.anomalies.len());
            writeln!(self.out, "{}", paint(c, Tone::Alert, &header))?;
            for a in &outcome.anomalies {
                writeln!(self.out, "{}", paint(c, Tone::Alert, &format!("   ! {a}")))?;
            }
            Ok(())
        }
    }

    /// Fails with the first error hit while printing rounds, if any.
    pub fn print_summary(&mut self, report: &MonitorReport) -> io::Result<()> {
        if let Some(e) = self.failed.take() {
            return Err(e);
        }
        writeln!(
            self.out,
            "\n{}",
            paint(self.use_color, Tone::Info, "MONITORING SUMMARY:")
        )?;
        writeln!(
            self.out,
            "   Scans completed: {}/{}",
            report.completed_scans, report.total_scans
        )?;
        writeln!(self.out, "   Total anomalies: {}", report.anomalies.len())?;
        writeln!(self.out, "   Files added: {}", report.added.len())?;
        writeln!(self.out, "   Files deleted: {}", report.deleted.len())?;
        writeln!(self.out, "   Files modified: {}", report.modified.len())
    }
}

impl HumanMonitorPrinter<io::Stdout> {
    pub fn stdout(color: ColorChoice) -> Self {
        HumanMonitorPrinter {
            out: io::stdout(),
            use_color: color.resolve_stdout(),
            failed: None,
        }
    }
}

impl<W: Write> MonitorObserver for HumanMonitorPrinter<W> {
    fn round_started(&mut self, round: usize, total: usize) {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("\nScan {round}/{total} at {now}");
        let res = writeln!(self.out, "{}", paint(self.use_color, Tone::Info, &line));
        keep_first(&mut self.failed, res);
    }

    fn round_finished(&mut self, outcome: &RoundOutcome) {
        let res = self.write_round(outcome).and_then(|()| self.out.flush());
        keep_first(&mut self.failed, res);
    }

    fn round_failed(&mut self, round: usize, error: &anyhow::Error) {
        let line = format!("Scan {round} failed: {error:#}");
        let res = writeln!(self.out, "{}", paint(self.use_color, Tone::Alert, &line));
        keep_first(&mut self.failed, res);
    }

    fn waiting(&mut self, interval: Duration) {
        let res = writeln!(
            self.out,
            "Waiting {} seconds until next scan...",
            interval.as_secs()
        )
        .and_then(|()| self.out.flush());
        keep_first(&mut self.failed, res);
    }

    fn keep_going(&self) -> bool {
        self.failed.is_none()
    }
}

/// Remember the first write error; later ones are usually the same broken pipe.
fn keep_first(slot: &mut Option<io::Error>, res: io::Result<()>) {
    if let Err(e) = res
        && slot.is_none()
    {
        *slot = Some(e);
    }
}

/// Emits one NDJSON object per round and one for the final report.
pub struct JsonMonitorPrinter<W: Write> {
    out: W,
    failed: Option<io::Error>,
}

impl<W: Write> JsonMonitorPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Fails with the first error hit while printing rounds, if any.
    pub fn print_summary(&mut self, report: &MonitorReport) -> io::Result<()> {
        if let Some(e) = self.failed.take() {
            return Err(e);
        }
        let mut obj = serde_json::to_value(report).map_err(io::Error::other)?;
        obj["type"] = serde_json::Value::from("report");
        writeln!(self.out, "{}", obj)
    }
}

impl JsonMonitorPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        JsonMonitorPrinter::new(io::stdout())
    }
}

impl<W: Write> MonitorObserver for JsonMonitorPrinter<W> {
    fn round_finished(&mut self, outcome: &RoundOutcome) {
        let obj = serde_json::json!({
            "type": "round",
            "round": outcome.round,
            "scanned_at": outcome.scanned_at.to_rfc3339(),
            "files": outcome.files,
            "changes": outcome.changes,
            "anomalies": outcome.anomalies,
        });
        let res = writeln!(self.out, "{}", obj).and_then(|()| self.out.flush());
        keep_first(&mut self.failed, res);
    }

    fn round_failed(&mut self, round: usize, error: &anyhow::Error) {
        let obj = serde_json::json!({
            "type": "error",
            "round": round,
            "error": format!("{error:#}"),
        });
        let res = writeln!(self.out, "{}", obj).and_then(|()| self.out.flush());
        keep_first(&mut self.failed, res);
    }

    fn keep_going(&self) -> bool {
        self.failed.is_none()
    }
}
