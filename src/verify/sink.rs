//! Output sinks for findings
//!
//! Findings are emitted one at a time in run order. `flush` is called at the
//! end of every resource type so output appears incrementally.

use std::io::Write;

use crate::config::OutputFormat;
use crate::error::CheckResult;
use crate::models::Finding;

use super::tabwriter::TabWriter;

pub const TABLE_HEADER: [&str; 7] = [
    "GROUP",
    "RESOURCE",
    "NAMESPACE",
    "NAME",
    "OWNER_UID",
    "LEVEL",
    "MESSAGE",
];

pub trait FindingSink {
    fn emit(&mut self, finding: &Finding<'_>) -> CheckResult<()>;

    fn flush(&mut self) -> CheckResult<()>;
}

/// Sink for the configured output format
pub fn sink_for<'w>(
    format: OutputFormat,
    out: &'w mut (dyn Write + Send),
) -> Box<dyn FindingSink + Send + 'w> {
    match format {
        OutputFormat::Table => Box::new(TableSink::new(out)),
        OutputFormat::Json => Box::new(JsonSink::new(out)),
    }
}

/// Aligned table; the header is written before the first finding only
pub struct TableSink<W: Write> {
    writer: TabWriter<W>,
    wrote_header: bool,
}

impl<W: Write> TableSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: TabWriter::new(out),
            wrote_header: false,
        }
    }
}

impl<W: Write> FindingSink for TableSink<W> {
    fn emit(&mut self, finding: &Finding<'_>) -> CheckResult<()> {
        if !self.wrote_header {
            self.writer.write_row(TABLE_HEADER);
            self.wrote_header = true;
        }
        self.writer.write_row([
            finding.resource.group.as_str(),
            finding.resource.resource.as_str(),
            finding.child.namespace.as_str(),
            finding.child.name.as_str(),
            finding.owner_reference.uid.as_str(),
            finding.level.as_str(),
            finding.message.as_str(),
        ]);
        Ok(())
    }

    fn flush(&mut self) -> CheckResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// One compact JSON document per line
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> FindingSink for JsonSink<W> {
    fn emit(&mut self, finding: &Finding<'_>) -> CheckResult<()> {
        serde_json::to_writer(&mut self.out, &finding.to_record())?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> CheckResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
