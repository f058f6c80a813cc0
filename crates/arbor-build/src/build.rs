use arbor_key::Key;
use arbor_store::{Descriptor, Entry, Storage};
use arbor_stream::{read_remaining, Stream};
use tracing::{debug, warn};

use crate::error::{BuildError, BuildResult};
use crate::source::Source;

/// Counters collected over one [`build`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Entries written by data sources.
    pub entries_written: usize,
    /// Children pulled from children sources.
    pub children_visited: usize,
    /// Sources that took the custom-build path.
    pub custom_builds: usize,
    /// Data sources whose writer ended invalid.
    pub invalid_streams: usize,
}

/// Materialise `source` into the storage below `target`.
///
/// For each source, in order:
///
/// 1. A custom build, if offered, replaces the rest of this list.
/// 2. A handle re-roots the source at `compose(target, handle)`.
/// 3. A data source writes into a detached entry of the storage's entry
///    type, whose payload then replaces the entry at its root. The source
///    may read the storage while it writes.
/// 4. A children source is drained; each child is built at
///    `compose(root, child key)` before the next key is pulled. A key that
///    is not strictly greater than its predecessor fails the build with
///    [`BuildError::OutOfOrder`].
///
/// An invalid writer after step 3 is logged and counted, not an error.
pub fn build<S, T>(source: &mut T, target: &Descriptor<'_, S>) -> BuildResult<BuildReport>
where
    S: Storage,
    T: Source<S> + ?Sized,
{
    let mut report = BuildReport::default();
    build_into(source, target, &mut report)?;
    debug!(
        root = %target.key(),
        entries = report.entries_written,
        children = report.children_visited,
        custom = report.custom_builds,
        invalid = report.invalid_streams,
        "build complete"
    );
    Ok(report)
}

fn build_into<S, T>(
    source: &mut T,
    target: &Descriptor<'_, S>,
    report: &mut BuildReport,
) -> BuildResult<()>
where
    S: Storage,
    T: Source<S> + ?Sized,
{
    if let Some(result) = source.build_custom(target) {
        report.custom_builds += 1;
        return result;
    }

    let root = match source.handle() {
        Some(handle) => target.join_key(&handle),
        None => target.clone(),
    };

    if source.has_data() {
        let mut staged = S::Entry::default();
        let valid = {
            let mut output = staged.writer();
            source.write_data(&mut output);
            output.valid()
        };
        root.write_bytes(&read_remaining(&mut staged.reader()));
        report.entries_written += 1;
        if !valid {
            report.invalid_streams += 1;
            warn!(key = %root.key(), "data source left its writer invalid");
        }
    }

    if let Some(children) = source.children() {
        let mut previous: Option<Key<S::Family>> = None;
        for (key, mut child) in children {
            if let Some(previous) = &previous {
                if key <= *previous {
                    return Err(BuildError::OutOfOrder {
                        parent: root.key().to_string(),
                        previous: previous.to_string(),
                        key: key.to_string(),
                    });
                }
            }
            report.children_visited += 1;
            build_into(child.as_mut(), &root.join_key(&key), report)?;
            previous = Some(key);
        }
    }

    Ok(())
}
