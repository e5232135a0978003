//! Check pipeline
//!
//! Structure:
//! - `validator.rs` - Per-ownerReference checks
//! - `report.rs` - Error/warning totals and the summary line
//! - `sink.rs` - Table and JSON output of findings
//! - `tabwriter.rs` - Column alignment for table output
//!
//! A run discovers the API surface, lists every enumerable resource type,
//! then validates each object's ownerReferences type by type, flushing output
//! after each type.

pub mod report;
pub mod sink;
pub mod tabwriter;
pub mod validator;

pub use report::Tally;
pub use sink::{FindingSink, JsonSink, TABLE_HEADER, TableSink, sink_for};
pub use validator::Validator;

use std::io::Write;

use tokio_util::sync::CancellationToken;

use crate::catalog::{DiscoverySource, GC_VERBS, ResourceCatalog};
use crate::config::OutputFormat;
use crate::diagnostics::Diagnostics;
use crate::error::{CheckError, CheckResult};
use crate::index::{FetchOptions, ObjectIndex, ObjectLister};
use crate::models::Level;

/// Settings for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    pub output: OutputFormat,
    /// Diagnostic verbosity, as counted from `-v` flags
    pub verbosity: u8,
    pub fetch: FetchOptions,
}

/// Runs a full consistency check against one discovery source and lister
pub struct Checker<'a, D: ?Sized, L: ?Sized> {
    discovery: &'a D,
    lister: &'a L,
    options: CheckOptions,
}

impl<'a, D, L> Checker<'a, D, L>
where
    D: DiscoverySource + ?Sized,
    L: ObjectLister + ?Sized,
{
    pub fn new(discovery: &'a D, lister: &'a L, options: CheckOptions) -> Self {
        Self {
            discovery,
            lister,
            options,
        }
    }

    /// Run the check, writing findings to `stdout` and everything else to
    /// `stderr`
    ///
    /// Returns the run totals. An `Err` means the run could not complete.
    pub async fn run(
        &self,
        stdout: &mut (dyn Write + Send),
        stderr: &mut (dyn Write + Send),
        cancel: &CancellationToken,
    ) -> CheckResult<Tally> {
        let mut diagnostics = Diagnostics::new(stderr, self.options.verbosity);

        let discovered = tokio::select! {
            _ = cancel.cancelled() => return Err(CheckError::Cancelled),
            discovered = self.discovery.discover() => discovered?,
        };
        let catalog = ResourceCatalog::from_discovery(&discovered, GC_VERBS);

        let mut tally = Tally::default();
        for (gv, err) in catalog.discovery_failures() {
            diagnostics.warning(format_args!(
                "could not discover resources in {}: {}",
                gv, err
            ))?;
            tally = tally.record(Level::Warning);
        }

        let index = ObjectIndex::fetch(
            &catalog,
            self.lister,
            self.options.fetch,
            &mut diagnostics,
            cancel,
        )
        .await?;
        tally = tally.with_warnings(index.list_failures().count());
        tracing::debug!(
            "Indexed {} objects across {} resource types",
            index.len(),
            catalog.entries().len()
        );

        let validator = Validator::new(&catalog, &index);
        let mut sink = sink_for(self.options.output, stdout);
        for resource in catalog.resources() {
            if cancel.is_cancelled() {
                return Err(CheckError::Cancelled);
            }
            for child in index.objects(resource) {
                if cancel.is_cancelled() {
                    return Err(CheckError::Cancelled);
                }
                for finding in validator.check_object(resource, child) {
                    tally = tally.record(finding.level);
                    sink.emit(&finding)?;
                }
            }
            sink.flush()?;
        }

        diagnostics.line(format_args!("{}", tally))?;
        Ok(tally)
    }
}
