//! The request entry point the HTTP front-end calls.

use crate::assemble::build_chain;
use crate::options::PipelineOptions;
use lessen_cache::{
    CacheEntry, ContentCache, DiskCache, FreshnessGate, LayeredCache, MemoryCache,
};
use lessen_common::timestamps_match;
use lessen_compile::{LessEngine, PassthroughEngine};
use lessen_config::LessenConfig;
use lessen_diagnostics::{Diagnostic, DiagnosticSink};
use lessen_source::{LastModifiedRetriever, LoadError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// The result of processing a stylesheet request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The caller's `If-Modified-Since` date is current; no body.
    NotModified,
    /// The transformed stylesheet.
    Success {
        /// Minified CSS.
        content: String,
        /// The freshness timestamp to serve as `Last-Modified`.
        last_modified: SystemTime,
    },
}

/// Handles stylesheet requests: freshness check, two-tier cache lookup,
/// and pipeline regeneration on miss.
///
/// One `Service` is shared by all requests. The caches are process-wide;
/// the stage chain (with its private marker generator) is constructed
/// fresh per regeneration.
pub struct Service {
    root: PathBuf,
    options: PipelineOptions,
    engine: Arc<dyn LessEngine>,
    retriever: LastModifiedRetriever,
    memory: Arc<MemoryCache>,
    disk: Arc<DiskCache>,
    sink: Arc<DiagnosticSink>,
}

impl Service {
    /// Creates a service reading stylesheets under `root` and caching
    /// under `cache_dir`, with a passthrough engine.
    pub fn new(
        root: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
        options: PipelineOptions,
        extensions: Vec<String>,
    ) -> Self {
        let root = root.into();
        let sink = Arc::new(DiagnosticSink::new());
        let retriever = LastModifiedRetriever::new(&root).with_extensions(extensions);
        let disk = Arc::new(DiskCache::new(
            cache_dir.into(),
            options.invalid_cache_behaviour,
            Arc::clone(&sink),
        ));
        Self {
            root,
            options,
            engine: Arc::new(PassthroughEngine),
            retriever,
            memory: Arc::new(MemoryCache::new()),
            disk,
            sink,
        }
    }

    /// Creates a service from a loaded configuration, resolving the
    /// configured directories against `base_dir`.
    pub fn from_config(config: &LessenConfig, base_dir: &Path) -> Self {
        Self::new(
            base_dir.join(&config.serve.root),
            base_dir.join(&config.serve.cache_dir),
            PipelineOptions::from_config(config),
            config.serve.extensions.clone(),
        )
    }

    /// Replaces the LESS engine.
    pub fn with_engine(mut self, engine: Arc<dyn LessEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Processes a request for `relative_path`.
    ///
    /// Freshness is the newest modification time in the stylesheet's
    /// folder, the same criterion that gates both cache tiers. A request
    /// whose `if_modified_since` is within one second of it short-circuits
    /// to [`Outcome::NotModified`]. Otherwise the layered cache answers,
    /// or the pipeline regenerates and both tiers are filled with an entry
    /// carrying the freshness timestamp (not the raw file date), so later
    /// lookups apply the same staleness criterion.
    pub fn process(
        &self,
        relative_path: &str,
        if_modified_since: Option<SystemTime>,
    ) -> Result<Outcome, LoadError> {
        if relative_path.trim().is_empty() {
            return Err(LoadError::BadInput);
        }
        let freshness = self.retriever.max_modified(relative_path)?;

        if let Some(date) = if_modified_since {
            if timestamps_match(date, freshness) {
                return Ok(Outcome::NotModified);
            }
        }

        let cache = LayeredCache::new(vec![
            Box::new(FreshnessGate::new(Arc::clone(&self.memory), freshness)),
            Box::new(FreshnessGate::new(Arc::clone(&self.disk), freshness)),
        ]);

        if let Some(entry) = cache.get(relative_path) {
            return Ok(Outcome::Success {
                content: entry.content,
                last_modified: entry.last_modified,
            });
        }

        let started = Instant::now();
        let chain = build_chain(
            &self.root,
            &self.options,
            Arc::clone(&self.engine),
            Arc::clone(&self.sink),
        );
        let produced = chain.load(relative_path)?;

        let entry = CacheEntry {
            relative_path: relative_path.to_string(),
            last_modified: freshness.max(produced.last_modified),
            content: produced.content,
            build_elapsed: started.elapsed(),
        };
        cache.put(relative_path, &entry);
        self.sink.emit(
            Diagnostic::note(format!(
                "regenerated in {}ms",
                entry.build_elapsed.as_millis()
            ))
            .with_origin(relative_path),
        );

        Ok(Outcome::Success {
            content: entry.content,
            last_modified: entry.last_modified,
        })
    }

    /// Drains the diagnostics accumulated since the last call.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.sink.take_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessen_compile::EngineError;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn service(root: &Path) -> (Service, PathBuf) {
        let cache_dir = root.join(".cache");
        (
            Service::new(
                root,
                &cache_dir,
                PipelineOptions::default(),
                vec!["css".to_string(), "less".to_string()],
            ),
            cache_dir,
        )
    }

    fn success(outcome: Outcome) -> (String, SystemTime) {
        match outcome {
            Outcome::Success {
                content,
                last_modified,
            } => (content, last_modified),
            Outcome::NotModified => panic!("expected Success, got NotModified"),
        }
    }

    #[test]
    fn flattens_and_minifies_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Test.css",
            "@import url(\"Test1.css\");\r\np { color: blue; }\r\n\r\n",
        );
        write(dir.path(), "Test1.css", "p { color: red; }\r\n\r\n");

        let (service, _) = service(dir.path());
        let (content, _) = success(service.process("Test.css", None).unwrap());
        assert_eq!(
            content,
            "#Test1.css_1,p{color:red}#Test.css_2,p{color:blue}"
        );
    }

    #[test]
    fn result_is_cached_in_both_tiers() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.css", "p { color: blue; }\n");

        let (service, cache_dir) = service(dir.path());
        let (first, _) = success(service.process("a.css", None).unwrap());
        assert!(cache_dir.join("a.css.cache").exists());

        let (second, _) = success(service.process("a.css", None).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn disk_cache_feeds_a_fresh_service() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.css", "p { color: blue; }\n");

        let (first_service, _) = service(dir.path());
        let (first, _) = success(first_service.process("a.css", None).unwrap());

        // A new service (empty memory tier) answers from disk.
        let (second_service, _) = service(dir.path());
        let (second, _) = success(second_service.process("a.css", None).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn not_modified_within_one_second_of_freshness() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.css", "p { color: blue; }\n");

        let (service, _) = service(dir.path());
        let (_, last_modified) = success(service.process("a.css", None).unwrap());

        let outcome = service.process("a.css", Some(last_modified)).unwrap();
        assert_eq!(outcome, Outcome::NotModified);

        let outcome = service
            .process("a.css", Some(last_modified - std::time::Duration::from_secs(5)))
            .unwrap();
        assert!(matches!(outcome, Outcome::Success { .. }));
    }

    #[test]
    fn empty_path_is_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service(dir.path());
        assert!(matches!(service.process("", None), Err(LoadError::BadInput)));
        assert!(matches!(
            service.process("   ", None),
            Err(LoadError::BadInput)
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "present.css", "p { x: 1; }\n");
        let (service, _) = service(dir.path());
        assert!(matches!(
            service.process("absent.css", None),
            Err(LoadError::NotFound { .. })
        ));
    }

    #[test]
    fn freshness_dominates_every_contributing_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.css", "@import url(\"b.css\");\n");
        write(dir.path(), "b.css", "p { x: 1; }\n");

        let (service, _) = service(dir.path());
        let (_, last_modified) = success(service.process("a.css", None).unwrap());

        for name in ["a.css", "b.css"] {
            let modified = std::fs::metadata(dir.path().join(name))
                .unwrap()
                .modified()
                .unwrap();
            assert!(last_modified >= modified);
        }
    }

    #[test]
    fn enhanced_pipeline_with_flattening_engine() {
        struct FlatteningStub;

        impl LessEngine for FlatteningStub {
            fn compile(&self, _source: &str) -> Result<String, EngineError> {
                // What a real engine makes of the marked, renamed input:
                // nested selectors flattened into full paths.
                Ok(
                    "scope-carrier #test.css_3,scope-carrier div.Header{color:black}"
                        .to_string(),
                )
            }
        }

        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "test.css",
            "html\n{\n  div.Header\n  {\n    color: black;\n  }\n}\n",
        );

        let service = Service::new(
            dir.path(),
            dir.path().join(".cache"),
            PipelineOptions::enhanced("html", "scope-carrier"),
            Vec::new(),
        )
        .with_engine(Arc::new(FlatteningStub));

        let (content, _) = success(service.process("test.css", None).unwrap());
        assert_eq!(content, "#test.css_3,div.Header{color:black}");
    }

    #[test]
    fn lenient_policies_surface_warnings_through_the_service() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.css", "@import url(\"a.css\");\np { x: 1; }\n");

        let options = PipelineOptions {
            on_circular_import: lessen_transform::ImportPolicy::WarnAndEmpty,
            ..PipelineOptions::default()
        };
        let service = Service::new(dir.path(), dir.path().join(".cache"), options, Vec::new());
        let (content, _) = success(service.process("a.css", None).unwrap());
        assert!(content.contains("p{x:1}"));

        let diagnostics = service.take_diagnostics();
        assert!(diagnostics
            .iter()
            .any(|d| d.message.contains("circular import")));
    }
}
