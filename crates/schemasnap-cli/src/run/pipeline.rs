use std::sync::Arc;
use std::time::Instant;

use schemasnap_core::{
    ArtifactKind, ArtifactWriter, Error as CoreError, InferenceOptions, RelationshipSet,
    SchemaSnapshot, infer_relationships, render_artifact,
};
use schemasnap_introspect::{CatalogReader, IntrospectOptions, load_catalog};

use super::{RunError, RunResult};

/// Everything a run needs besides the reader and writer.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub introspect: IntrospectOptions,
    pub inference: InferenceOptions,
    /// Keep writing remaining artifacts after a write failure.
    pub keep_going: bool,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub snapshot: Arc<SchemaSnapshot>,
    pub relationships: usize,
    pub written: Vec<ArtifactKind>,
    pub failures: Vec<CoreError>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Load the catalog, infer relationships, render every artifact and write
/// them in artifact order.
///
/// Catalog failures abort before anything is written. Write failures abort
/// immediately unless `keep_going` is set, in which case they are collected
/// in the summary.
pub async fn execute<R, W>(
    reader: &R,
    writer: &W,
    settings: &RunSettings,
) -> Result<RunSummary, PipelineError>
where
    R: CatalogReader + ?Sized,
    W: ArtifactWriter + ?Sized,
{
    let timer = Instant::now();

    let loaded = load_catalog(reader, &settings.introspect).await?;
    tracing::info!(
        event = "catalog_loaded",
        tables = loaded.snapshot.tables().len(),
        columns = loaded.columns.len(),
        elapsed_ms = timer.elapsed().as_millis() as u64
    );

    let snapshot = Arc::new(loaded.snapshot);
    let relationships = infer_relationships(&loaded.columns, &settings.inference)
        .aligned_to(snapshot.table_names());
    tracing::info!(
        event = "relationships_inferred",
        strategy = ?settings.inference.strategy,
        algorithm = ?settings.inference.algorithm,
        count = relationships.len()
    );
    let relationship_count = relationships.len();

    let rendered = render_artifacts(Arc::clone(&snapshot), Arc::new(relationships)).await?;
    let (written, failures) = write_artifacts(writer, &rendered, settings.keep_going)?;

    Ok(RunSummary {
        snapshot,
        relationships: relationship_count,
        written,
        failures,
    })
}

/// Run the six renderers as independent blocking tasks and collect their
/// output in artifact order.
pub async fn render_artifacts(
    snapshot: Arc<SchemaSnapshot>,
    relationships: Arc<RelationshipSet>,
) -> RunResult<Vec<(ArtifactKind, String)>> {
    let handles: Vec<_> = ArtifactKind::ALL
        .into_iter()
        .map(|kind| {
            let snapshot = Arc::clone(&snapshot);
            let relationships = Arc::clone(&relationships);
            let handle = tokio::task::spawn_blocking(move || {
                render_artifact(kind, &snapshot, &relationships)
            });
            (kind, handle)
        })
        .collect();

    let mut rendered = Vec::with_capacity(handles.len());
    for (kind, handle) in handles {
        let content = handle
            .await
            .map_err(|err| RunError::Task(format!("{kind}: {err}")))?;
        rendered.push((kind, content));
    }

    Ok(rendered)
}

/// Write rendered artifacts in order. Returns the artifacts written and, when
/// `keep_going` is set, the failures encountered along the way.
pub fn write_artifacts<W>(
    writer: &W,
    rendered: &[(ArtifactKind, String)],
    keep_going: bool,
) -> Result<(Vec<ArtifactKind>, Vec<CoreError>), CoreError>
where
    W: ArtifactWriter + ?Sized,
{
    let mut written = Vec::new();
    let mut failures = Vec::new();

    for (kind, content) in rendered {
        match writer.write(*kind, content) {
            Ok(()) => {
                tracing::info!(event = "artifact_written", artifact = %kind, bytes = content.len());
                written.push(*kind);
            }
            Err(err) => {
                tracing::error!(event = "artifact_failed", artifact = %kind, error = %err);
                if !keep_going {
                    return Err(err);
                }
                failures.push(err);
            }
        }
    }

    Ok((written, failures))
}
