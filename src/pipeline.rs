//! Single entry point: decorate, group and render a database.

use crate::config::Config;
use crate::error::Result;
use crate::model::Database;
use crate::render::{FsLoader, HandlebarsEngine, Renderer, TemplateEngine, TemplateLoader};
use crate::resolve::{DefaultResolver, Resolver};

/// Generate source text for `database` with the default resolver, the
/// filesystem loader and Handlebars.
///
/// # Example
///
/// ```rust,no_run
/// use sqlts::{Config, Database, generate};
///
/// let db = Database::from_json(&std::fs::read_to_string("schema.json")?)?;
/// let code = generate(db, &Config::default())?;
/// println!("{}", code);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn generate(database: Database, config: &Config) -> Result<String> {
    Generator::new().generate(database, config)
}

/// Pipeline with an injectable resolver and renderer.
///
/// Holds no state of its own between calls; anything a custom resolver
/// remembers is the resolver's business.
#[derive(Debug, Clone, Default)]
pub struct Generator<R = DefaultResolver, L = FsLoader, E = HandlebarsEngine> {
    resolver: R,
    renderer: Renderer<L, E>,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R, L, E> Generator<R, L, E>
where
    R: Resolver,
    L: TemplateLoader,
    E: TemplateEngine,
{
    pub fn with(resolver: R, renderer: Renderer<L, E>) -> Self {
        Self { resolver, renderer }
    }

    /// Swap the resolver, keeping the renderer.
    pub fn resolver<R2: Resolver>(self, resolver: R2) -> Generator<R2, L, E> {
        Generator {
            resolver,
            renderer: self.renderer,
        }
    }

    /// Decorate, group and render. No validation happens here; malformed
    /// input surfaces as a resolver or template error.
    pub fn generate(&mut self, database: Database, config: &Config) -> Result<String> {
        tracing::debug!(
            "Generating {} tables, {} enums",
            database.tables.len(),
            database.enums.len()
        );
        self.renderer
            .stringify_database(&database, config, &mut self.resolver)
    }
}
