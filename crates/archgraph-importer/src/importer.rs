use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use archgraph_config::ImportConfig;
use archgraph_types::{
    binary_name, ClassDetails, ClassId, ClassKind, ClassPool, ImportedClasses, UpgradeError,
};
use rayon::prelude::*;

use crate::builder::build_class_signature;
use crate::record::{ClassRecord, ClassResolver};

/// What happened to one record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported,
    /// Imported with an empty type-parameter list and a diagnostic; the signature was rejected.
    Degraded,
    /// The class was already resolved in this session; the record was ignored.
    Duplicate,
}

/// Counters for one import session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub degraded: usize,
    pub duplicates: usize,
    /// Classes supplied by the [`ClassResolver`] during dependency completion.
    pub resolved_dependencies: usize,
    pub resolution_rounds: u32,
    /// Classes still stubs when the session ended.
    pub stubs: usize,
}

impl ImportSummary {
    fn record(&mut self, outcome: ImportOutcome) {
        match outcome {
            ImportOutcome::Imported => self.imported += 1,
            ImportOutcome::Degraded => {
                self.imported += 1;
                self.degraded += 1;
            }
            ImportOutcome::Duplicate => self.duplicates += 1,
        }
    }
}

enum WorkerPool {
    Rayon(rayon::ThreadPool),
    Inline,
}

fn build_worker_pool(threads: usize) -> WorkerPool {
    let mut threads = threads.max(1);
    loop {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("archgraph-import-{idx}"))
            .build()
        {
            Ok(pool) => return WorkerPool::Rayon(pool),
            // Thread creation can fail under low process limits; retry smaller.
            Err(_) if threads > 1 => threads = (threads / 2).max(1),
            Err(err) => {
                tracing::debug!(
                    target: "archgraph.import",
                    error = %err,
                    "failed to start import workers; importing inline"
                );
                return WorkerPool::Inline;
            }
        }
    }
}

/// Imports class records into a class model.
///
/// ```
/// use archgraph_importer::{ClassFileImporter, ClassRecord};
///
/// let classes = ClassFileImporter::new().import_classes(vec![
///     ClassRecord::class("com/example/Box").with_signature("<T:>Ljava/lang/Object;"),
/// ]);
/// let class = classes.get("com.example.Box").unwrap();
/// assert_eq!(class.type_parameters()[0].name(), "T");
/// ```
pub struct ClassFileImporter {
    config: ImportConfig,
    resolver: Option<Arc<dyn ClassResolver>>,
}

impl Default for ClassFileImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassFileImporter {
    pub fn new() -> Self {
        Self::with_config(ImportConfig::default())
    }

    pub fn with_config(config: ImportConfig) -> Self {
        Self {
            config,
            resolver: None,
        }
    }

    /// Source for classes that are still stubs after the batch. Only consulted when
    /// `resolve_missing_dependencies` is enabled.
    pub fn with_resolver(mut self, resolver: impl ClassResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Imports `records` into a fresh session and returns the frozen model.
    pub fn import_classes(&self, records: impl IntoIterator<Item = ClassRecord>) -> ImportedClasses {
        let pool = ClassPool::new();
        self.import_into(&pool, records.into_iter().collect());
        pool.freeze()
    }

    /// Imports `records` into an existing session.
    pub fn import_into(&self, pool: &ClassPool, records: Vec<ClassRecord>) -> ImportSummary {
        let start = Instant::now();
        let workers = if self.config.parallel && records.len() > 1 {
            build_worker_pool(self.config.effective_threads())
        } else {
            WorkerPool::Inline
        };

        let mut summary = ImportSummary::default();
        for outcome in import_batch(&workers, pool, &records) {
            summary.record(outcome);
        }

        if self.config.resolve_missing_dependencies {
            if let Some(resolver) = &self.resolver {
                self.complete_dependencies(&workers, pool, resolver.as_ref(), &mut summary);
            }
        }

        summary.stubs = pool.stubs().len();
        tracing::info!(
            target: "archgraph.import",
            imported = summary.imported,
            degraded = summary.degraded,
            duplicates = summary.duplicates,
            resolved_dependencies = summary.resolved_dependencies,
            stubs = summary.stubs,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "imported classes"
        );
        summary
    }

    fn complete_dependencies(
        &self,
        workers: &WorkerPool,
        pool: &ClassPool,
        resolver: &dyn ClassResolver,
        summary: &mut ImportSummary,
    ) {
        // Each stub is offered to the resolver once per session.
        let mut attempted = HashSet::<ClassId>::new();
        for _ in 0..self.config.max_resolution_iterations {
            let pending: Vec<ClassId> = pool
                .stubs()
                .into_iter()
                .filter(|id| attempted.insert(*id))
                .collect();
            if pending.is_empty() {
                break;
            }
            summary.resolution_rounds += 1;

            let records: Vec<ClassRecord> = pending
                .iter()
                .filter_map(|id| pool.node(*id))
                .filter_map(|node| resolver.resolve(node.name()))
                .collect();
            tracing::debug!(
                target: "archgraph.import",
                round = summary.resolution_rounds,
                stubs = pending.len(),
                found = records.len(),
                "resolving missing dependencies"
            );
            if records.is_empty() {
                break;
            }

            for outcome in import_batch(workers, pool, &records) {
                if outcome != ImportOutcome::Duplicate {
                    summary.resolved_dependencies += 1;
                }
                summary.record(outcome);
            }
        }
    }
}

fn import_batch(workers: &WorkerPool, pool: &ClassPool, records: &[ClassRecord]) -> Vec<ImportOutcome> {
    let mut outcomes = Vec::with_capacity(records.len());
    for wave in nesting_waves(records) {
        match workers {
            WorkerPool::Rayon(threads) => threads.install(|| {
                outcomes.par_extend(wave.par_iter().map(|record| import_record(pool, record)))
            }),
            WorkerPool::Inline => {
                outcomes.extend(wave.iter().map(|record| import_record(pool, record)))
            }
        }
    }
    outcomes
}

/// Groups `records` by nesting depth within the batch, so every class is built after the
/// records for its enclosing classes and can reference their type parameters.
fn nesting_waves(records: &[ClassRecord]) -> Vec<Vec<&ClassRecord>> {
    let by_name: HashMap<String, usize> = records
        .iter()
        .enumerate()
        .map(|(index, record)| (binary_name(&record.name).into_owned(), index))
        .collect();

    let mut waves: Vec<Vec<&ClassRecord>> = Vec::new();
    for record in records {
        let mut depth = 0;
        let mut enclosing = record.enclosing_name();
        while let Some(&index) = enclosing.as_ref().and_then(|name| by_name.get(name)) {
            depth += 1;
            // A cyclic chain cannot be deeper than the batch.
            if depth >= records.len() {
                break;
            }
            enclosing = records[index].enclosing_name();
        }
        if waves.len() <= depth {
            waves.resize_with(depth + 1, Vec::new);
        }
        waves[depth].push(record);
    }
    waves
}

/// Imports one record. Failures stay local to the record's class.
///
/// Type variables of enclosing classes only resolve if those classes were imported first.
pub fn import_record(pool: &ClassPool, record: &ClassRecord) -> ImportOutcome {
    let id = pool.resolve(&record.name);
    if !pool.is_stub(id) {
        log_duplicate(&record.name);
        return ImportOutcome::Duplicate;
    }

    let kind = ClassKind::from_access_flags(record.access_flags, record.super_class.as_deref());
    let mut details = ClassDetails::new(kind);
    details.access_flags = record.access_flags;
    details.super_class = record.super_class.as_deref().map(|name| pool.resolve(name));
    details.interfaces = record
        .interfaces
        .iter()
        .map(|name| pool.resolve(name))
        .collect();
    details.enclosing_class = match &record.enclosing_class {
        Some(name) => Some(pool.resolve(name)),
        // A `$` in the name only suggests nesting; do not register a stub for a guess.
        None => record.enclosing_name().and_then(|name| pool.lookup(&name)),
    };

    let mut outcome = ImportOutcome::Imported;
    if let Some(signature) = record.signature.as_deref() {
        match build_class_signature(pool, id, details.enclosing_class, signature) {
            Ok(built) => {
                details.type_parameters = built.type_parameters;
                if !matches!(kind, ClassKind::Interface | ClassKind::Annotation) {
                    details.generic_super_class = Some(built.super_class);
                }
                details.generic_interfaces = built.interfaces;
            }
            Err(err) => {
                tracing::debug!(
                    target: "archgraph.import",
                    class = %record.name,
                    code = err.code(),
                    error = %err,
                    "ignoring class signature"
                );
                details.diagnostics.push(err.to_diagnostic());
                outcome = ImportOutcome::Degraded;
            }
        }
    }

    match pool.upgrade(id, details) {
        Ok(()) => outcome,
        Err(UpgradeError::AlreadyResolved { .. }) => {
            log_duplicate(&record.name);
            ImportOutcome::Duplicate
        }
        Err(err @ UpgradeError::UnknownClass(_)) => {
            // `id` was just issued by this pool.
            tracing::debug!(target: "archgraph.import", class = %record.name, error = %err, "dropping class");
            ImportOutcome::Duplicate
        }
    }
}

fn log_duplicate(name: &str) {
    tracing::warn!(
        target: "archgraph.import",
        class = %name,
        "class already imported; ignoring duplicate definition"
    );
}
