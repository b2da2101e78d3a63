//! Template rendering.
//!
//! Rendering is three separate steps, each with its own failure:
//!
//! 1. **Load** the template text ([`TemplateLoader`]) → [`Error::FileRead`]
//! 2. **Compile** it ([`TemplateEngine`]) → [`Error::TemplateCompile`]
//! 3. **Invoke** it with a [`RenderContext`] ([`CompiledTemplate`]) → [`Error::TemplateRender`]
//!
//! The template sees exactly `{ grouped, config }`:
//!
//! ```text
//! {{#each grouped}}          namespace name in @key
//!   {{#each enums}} ... {{/each}}
//!   {{#each tables}} {{interfaceName}} {{#each columns}} {{name}}: {{decoratedType}} {{/each}} {{/each}}
//! {{/each}}
//! ```

use std::io;
use std::path::{Path, PathBuf};

use handlebars::{Handlebars, handlebars_helper};
use serde::Serialize;

use crate::config::Config;
use crate::decorate::decorate_database;
use crate::error::{Error, Result};
use crate::group::{GroupedSchema, group_by_schema};
use crate::model::Database;
use crate::resolve::{Resolver, safe_identifier};

/// Bundled template, relative to an install directory.
pub const BUNDLED_TEMPLATE: &str = "templates/default.handlebars";

/// Bundled template in the source tree. Used when no installed copy is found.
pub const DEFAULT_TEMPLATE_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/templates/default.handlebars");

handlebars_helper!(ident: |name: str| safe_identifier(name));

const TEMPLATE_NAME: &str = "sqlts";

/// The single value a template is invoked with.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext<'a> {
    pub grouped: &'a GroupedSchema<'a>,
    pub config: &'a Config,
}

/// Reads template text.
pub trait TemplateLoader {
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Compiles template text into something that can be invoked.
pub trait TemplateEngine {
    type Compiled: CompiledTemplate;

    fn compile(&self, source: &str) -> Result<Self::Compiled>;
}

/// A compiled template.
pub trait CompiledTemplate {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<String>;
}

/// Loads templates from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl TemplateLoader for FsLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Handlebars-backed engine. Output is source code, so HTML escaping is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandlebarsEngine {
    strict: bool,
}

impl HandlebarsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail rendering on references to missing fields instead of printing nothing.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// A template compiled by [`HandlebarsEngine`].
#[derive(Debug, Clone)]
pub struct HandlebarsTemplate {
    registry: Handlebars<'static>,
}

impl TemplateEngine for HandlebarsEngine {
    type Compiled = HandlebarsTemplate;

    fn compile(&self, source: &str) -> Result<HandlebarsTemplate> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(self.strict);
        registry.register_helper("ident", Box::new(ident));
        registry.register_template_string(TEMPLATE_NAME, source)?;
        Ok(HandlebarsTemplate { registry })
    }
}

impl CompiledTemplate for HandlebarsTemplate {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(self.registry.render(TEMPLATE_NAME, ctx)?)
    }
}

/// Where the template for `config` is read from: the user template when
/// set, otherwise the bundled one.
pub fn template_path(config: &Config) -> PathBuf {
    match config.template_path() {
        Some(path) => path.to_path_buf(),
        None => default_template_path(),
    }
}

/// The bundled template next to the running executable, falling back to the
/// source tree.
pub fn default_template_path() -> PathBuf {
    let exe = std::env::current_exe().ok();
    default_template_in(exe.as_deref().and_then(Path::parent))
}

/// Look for the bundled template in `install_dir` and in
/// `install_dir/../share/sqlts`, else [`DEFAULT_TEMPLATE_PATH`].
pub fn default_template_in(install_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = install_dir {
        let candidates = [
            dir.join(BUNDLED_TEMPLATE),
            dir.join("..").join("share").join("sqlts").join(BUNDLED_TEMPLATE),
        ];
        if let Some(found) = candidates.into_iter().find(|p| p.is_file()) {
            return found;
        }
    }
    PathBuf::from(DEFAULT_TEMPLATE_PATH)
}

/// Loads, compiles and invokes templates. Nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct Renderer<L = FsLoader, E = HandlebarsEngine> {
    loader: L,
    engine: E,
}

impl Renderer {
    /// Filesystem loader, Handlebars engine.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: TemplateLoader, E: TemplateEngine> Renderer<L, E> {
    pub fn with(loader: L, engine: E) -> Self {
        Self { loader, engine }
    }

    /// Step 1: read the user template, or the bundled one.
    pub fn load(&self, config: &Config) -> Result<String> {
        let path = template_path(config);
        tracing::debug!("Loading template {}", path.display());
        self.loader.read(&path).map_err(|e| {
            tracing::warn!("Cannot read template {}: {}", path.display(), e);
            Error::FileRead(e)
        })
    }

    /// Step 2: compile template text.
    pub fn compile(&self, source: &str) -> Result<E::Compiled> {
        self.engine.compile(source)
    }

    /// Render an already grouped schema.
    pub fn render_grouped(&self, grouped: &GroupedSchema<'_>, config: &Config) -> Result<String> {
        let template = self.compile(&self.load(config)?)?;
        template.render(&RenderContext { grouped, config })
    }

    /// Decorate a copy of `database`, group it and render it. The output of
    /// the template is returned unchanged.
    pub fn stringify_database<R>(
        &self,
        database: &Database,
        config: &Config,
        resolver: &mut R,
    ) -> Result<String>
    where
        R: Resolver + ?Sized,
    {
        let template = self.compile(&self.load(config)?)?;

        let mut decorated = database.clone();
        decorate_database(&mut decorated, config, resolver)?;
        let grouped = group_by_schema(&decorated);

        template.render(&RenderContext {
            grouped: &grouped,
            config,
        })
    }
}

/// [`Renderer::stringify_database`] with the filesystem loader and Handlebars.
pub fn stringify_database<R>(database: &Database, config: &Config, resolver: &mut R) -> Result<String>
where
    R: Resolver + ?Sized,
{
    Renderer::new().stringify_database(database, config, resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, Table};
    use crate::resolve::ResolveError;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Returns fixed text and remembers which paths were read.
    struct StubLoader {
        text: &'static str,
        reads: RefCell<Vec<PathBuf>>,
    }

    impl StubLoader {
        fn new(text: &'static str) -> Self {
            Self {
                text,
                reads: RefCell::new(Vec::new()),
            }
        }
    }

    impl TemplateLoader for StubLoader {
        fn read(&self, path: &Path) -> io::Result<String> {
            self.reads.borrow_mut().push(path.to_path_buf());
            Ok(self.text.to_string())
        }
    }

    /// Records compiled sources and render contexts, renders a fixed string.
    #[derive(Default)]
    struct StubEngine {
        sources: RefCell<Vec<String>>,
        contexts: Rc<RefCell<Vec<Value>>>,
    }

    struct StubTemplate {
        contexts: Rc<RefCell<Vec<Value>>>,
    }

    impl TemplateEngine for StubEngine {
        type Compiled = StubTemplate;

        fn compile(&self, source: &str) -> Result<StubTemplate> {
            self.sources.borrow_mut().push(source.to_string());
            Ok(StubTemplate {
                contexts: Rc::clone(&self.contexts),
            })
        }
    }

    impl CompiledTemplate for StubTemplate {
        fn render(&self, ctx: &RenderContext<'_>) -> Result<String> {
            self.contexts
                .borrow_mut()
                .push(serde_json::to_value(ctx).unwrap());
            Ok("compiledTemplate".to_string())
        }
    }

    /// Names every table `<name>_i` and types every column `<type>_t`.
    struct Suffixer;

    impl Resolver for Suffixer {
        fn resolve_interface_name(
            &mut self,
            table_name: &str,
            _config: &Config,
        ) -> std::result::Result<String, ResolveError> {
            Ok(format!("{}_i", table_name))
        }

        fn resolve_column_type(
            &mut self,
            column: &Column,
            _table: &Table,
            _config: &Config,
        ) -> std::result::Result<String, ResolveError> {
            Ok(format!("{}_t", column.typ))
        }
    }

    fn fixture() -> Database {
        Database::new()
            .table(Table::new("schema1", "tname1").column("col1", "type1"))
            .table(Table::new("schema1", "tname2").column("col2", "type2"))
            .table(Table::new("schema2", "tname3").column("col3", "type3"))
    }

    #[test]
    fn test_uses_default_template() {
        let renderer = Renderer::with(StubLoader::new("defaultTemplate"), StubEngine::default());
        let config = Config::builder().schema_as_namespace(true).build();

        let out = renderer
            .stringify_database(&fixture(), &config, &mut Suffixer)
            .unwrap();

        assert_eq!(
            *renderer.loader.reads.borrow(),
            vec![default_template_path()]
        );
        assert_eq!(*renderer.engine.sources.borrow(), vec!["defaultTemplate"]);
        assert_eq!(renderer.engine.contexts.borrow().len(), 1);
        assert_eq!(out, "compiledTemplate");
    }

    #[test]
    fn test_uses_supplied_template() {
        let renderer = Renderer::with(StubLoader::new("template"), StubEngine::default());
        let config = Config::builder()
            .schema_as_namespace(true)
            .template("userdefinedtemplate")
            .build();

        let out = renderer
            .stringify_database(&fixture(), &config, &mut Suffixer)
            .unwrap();

        assert_eq!(
            *renderer.loader.reads.borrow(),
            vec![PathBuf::from("userdefinedtemplate")]
        );
        assert_eq!(*renderer.engine.sources.borrow(), vec!["template"]);
        assert_eq!(out, "compiledTemplate");
    }

    #[test]
    fn test_invokes_template_with_grouped_schema_and_config() {
        let renderer = Renderer::with(StubLoader::new("template"), StubEngine::default());
        let config = Config::builder()
            .schema_as_namespace(true)
            .template("userdefinedtemplate")
            .build();

        renderer
            .stringify_database(&fixture(), &config, &mut Suffixer)
            .unwrap();

        let table = |name: &str, schema: &str, col: &str, typ: &str| {
            json!({
                "name": name,
                "schema": schema,
                "interfaceName": format!("{}_i", name),
                "columns": [{
                    "name": col,
                    "type": typ,
                    "nullable": false,
                    "decoratedType": format!("{}_t", typ)
                }]
            })
        };
        let expected = json!({
            "grouped": {
                "schema1": {
                    "enums": [],
                    "tables": [
                        table("tname1", "schema1", "col1", "type1"),
                        table("tname2", "schema1", "col2", "type2")
                    ]
                },
                "schema2": {
                    "enums": [],
                    "tables": [table("tname3", "schema2", "col3", "type3")]
                }
            },
            "config": serde_json::to_value(&config).unwrap()
        });
        assert_eq!(renderer.engine.contexts.borrow()[0], expected);
    }

    #[test]
    fn test_input_database_is_not_modified() {
        let renderer = Renderer::with(StubLoader::new("t"), StubEngine::default());
        let db = fixture();
        renderer
            .stringify_database(&db, &Config::default(), &mut Suffixer)
            .unwrap();
        assert_eq!(db, fixture());
    }

    #[test]
    fn test_empty_database_still_renders() {
        let renderer = Renderer::with(StubLoader::new("t"), StubEngine::default());
        let config = Config::default();

        let out = renderer
            .stringify_database(&Database::new(), &config, &mut Suffixer)
            .unwrap();

        assert_eq!(out, "compiledTemplate");
        assert_eq!(renderer.engine.contexts.borrow()[0]["grouped"], json!({}));
    }

    #[test]
    fn test_missing_template_is_file_read_error() {
        let config = Config::builder()
            .template("/definitely/not/here.handlebars")
            .build();
        let err = stringify_database(&fixture(), &config, &mut Suffixer).unwrap_err();
        assert!(err.is_file_read());
    }

    #[test]
    fn test_bad_syntax_is_compile_error() {
        let err = HandlebarsEngine::new().compile("{{#each grouped}}").unwrap_err();
        assert!(matches!(err, Error::TemplateCompile(_)));
    }

    #[test]
    fn test_strict_mode_missing_field_is_render_error() {
        let template = HandlebarsEngine::strict().compile("{{nope}}").unwrap();
        let db = Database::new();
        let grouped = group_by_schema(&db);
        let config = Config::default();

        let err = template
            .render(&RenderContext {
                grouped: &grouped,
                config: &config,
            })
            .unwrap_err();
        assert!(matches!(err, Error::TemplateRender(_)));
    }

    #[test]
    fn test_default_template_found_next_to_install() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("templates")).unwrap();
        std::fs::write(dir.path().join(BUNDLED_TEMPLATE), "x").unwrap();

        assert_eq!(
            default_template_in(Some(dir.path())),
            dir.path().join(BUNDLED_TEMPLATE)
        );
    }

    #[test]
    fn test_default_template_found_in_share_dir() {
        let root = tempfile::tempdir().unwrap();
        let bin = root.path().join("bin");
        let share = root.path().join("share").join("sqlts").join("templates");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::create_dir_all(&share).unwrap();
        std::fs::write(share.join("default.handlebars"), "x").unwrap();

        let found = default_template_in(Some(&bin));
        assert!(found.is_file());
        assert!(found.ends_with(BUNDLED_TEMPLATE));
        assert!(found.starts_with(&bin));
    }

    #[test]
    fn test_default_template_falls_back_to_source_tree() {
        let empty = tempfile::tempdir().unwrap();
        assert_eq!(
            default_template_in(Some(empty.path())),
            PathBuf::from(DEFAULT_TEMPLATE_PATH)
        );
        assert_eq!(default_template_in(None), PathBuf::from(DEFAULT_TEMPLATE_PATH));
        assert!(Path::new(DEFAULT_TEMPLATE_PATH).is_file());
    }

    #[test]
    fn test_user_template_wins_over_bundled() {
        let config = Config::builder().template("mine.handlebars").build();
        assert_eq!(template_path(&config), PathBuf::from("mine.handlebars"));
        assert_eq!(template_path(&Config::default()), default_template_path());
    }

    #[test]
    fn test_ident_helper_escapes_reserved_words() {
        let template = HandlebarsEngine::new()
            .compile("{{#each grouped}}{{ident @key}};{{/each}}")
            .unwrap();
        let db = Database::new()
            .table(Table::new("public", "a"))
            .table(Table::new("sales", "b"));
        let grouped = group_by_schema(&db);
        let config = Config::default();

        let out = template
            .render(&RenderContext {
                grouped: &grouped,
                config: &config,
            })
            .unwrap();
        assert_eq!(out, "public_;sales;");
    }

    #[test]
    fn test_handlebars_does_not_escape() {
        let template = HandlebarsEngine::new()
            .compile("{{#each grouped}}{{@key}}: {{#each tables}}<{{interfaceName}}>'{{/each}}{{/each}}")
            .unwrap();
        let mut db = Database::new().table(Table::new("public", "users"));
        db.tables[0].interface_name = Some("Users".to_string());
        let grouped = group_by_schema(&db);
        let config = Config::default();

        let out = template
            .render(&RenderContext {
                grouped: &grouped,
                config: &config,
            })
            .unwrap();
        assert_eq!(out, "public: <Users>'");
    }
}
