//! CLI module for the newsdesk application
//!
//! This module handles the command-line interface for interacting with the
//! article store, the markdown renderer and the draft generator.
use std::{
    fs::{read_to_string, OpenOptions},
    io::{stdin, stdout, Read, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, info};
use tempfile::Builder;
use tokio::sync::Mutex;

use crate::{
    content_snippet, format_display_date, launch_editor, strip_editor_comments, to_html, Article,
    ArticleDraft, ArticleStore, Commands, Config, ContentGenerator, ContentSource,
    KeyValueBackend, ListArticlesOptions, MarkdownRenderer, NewsError, RenderedBlock, Result,
    SNIPPET_LEN,
};

/// CLI Application handler - processes CLI commands and interfaces with ArticleStore
pub struct App<B: KeyValueBackend> {
    /// The article store; the lock is held for each whole read-modify-write cycle
    store: Arc<Mutex<ArticleStore<B>>>,

    /// Draft generator, absent when no API key is configured
    generator: Option<Arc<dyn ContentGenerator>>,

    /// Application configuration
    config: Config,

    /// Where `config --set/--reset` write to
    config_path: PathBuf,

    /// Whether to display verbose output
    verbose: bool,
}

impl<B: KeyValueBackend> App<B> {
    /// Create a new CLI application with the given (already loaded) store and config
    pub fn new(
        store: Arc<Mutex<ArticleStore<B>>>,
        config: Config,
        config_path: PathBuf,
        verbose: bool,
    ) -> Self {
        Self {
            store,
            generator: None,
            config,
            config_path,
            verbose,
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn ContentGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Run the CLI application with the given command
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Create {
                title,
                author,
                image,
                source,
            } => self.create_article(title, author, image, source).await,

            Commands::Edit {
                id,
                title,
                author,
                image,
                source,
            } => self.edit_article(id, title, author, image, source).await,

            Commands::View { id, html, json } => self.view_article(&id, html, json).await,

            Commands::List(options) => self.list_articles(options).await,

            Commands::Search { query, limit, json } => {
                self.search_articles(&query, limit, json).await
            }

            Commands::Delete { id, force } => self.delete_article(&id, force).await,

            Commands::Generate { title } => {
                let content = self.generate(&title).await?;
                println!("{}", content);
                Ok(())
            }

            Commands::Render { file, html } => self.render_markdown(file, html),

            Commands::Config { show, set, reset } => self.handle_config(show, set, reset),
        }
    }

    async fn create_article(
        &self,
        title: String,
        author: Option<String>,
        image: Option<String>,
        source: ContentSource,
    ) -> Result<()> {
        let content = self
            .resolve_content(&title, None, &source)
            .await?
            .unwrap_or_default();

        let draft = ArticleDraft {
            title,
            content,
            author: author
                .or_else(|| self.config.default_author.clone())
                .unwrap_or_default(),
            image_url: image,
        };
        draft.validate()?;

        let article = Article::new(draft);
        let id = article.id.clone();
        let total = self.store.lock().await.upsert(article).len();

        println!("Article created with ID: {}", id);
        if self.verbose {
            println!("{} articles in store", total);
        }
        Ok(())
    }

    async fn edit_article(
        &self,
        id: String,
        title: Option<String>,
        author: Option<String>,
        image: Option<String>,
        source: ContentSource,
    ) -> Result<()> {
        let mut store = self.store.lock().await;

        let existing = store
            .get(&id)
            .cloned()
            .ok_or_else(|| NewsError::ArticleNotFound { id: id.clone() })?;

        let mut draft = existing.to_draft();
        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(author) = author {
            draft.author = author;
        }
        if let Some(image) = image {
            draft.image_url = Some(image);
        }
        if let Some(content) = self
            .resolve_content(&draft.title, Some(&existing.content), &source)
            .await?
        {
            draft.content = content;
        }
        draft.validate()?;

        store.upsert(existing.revise(draft));
        println!("Article {} updated successfully", id);
        Ok(())
    }

    /// Works out the article body from the content flags.
    ///
    /// Returns `None` when no content flag was given.
    async fn resolve_content(
        &self,
        title: &str,
        existing: Option<&str>,
        source: &ContentSource,
    ) -> Result<Option<String>> {
        if let Some(content) = &source.content {
            return Ok(Some(content.clone()));
        }

        if let Some(path) = &source.file {
            return self.read_content_from_file(path).map(Some);
        }

        let starting_point = if source.generate {
            Some(self.generate(title).await?)
        } else {
            existing.map(str::to_string)
        };

        if source.edit {
            let edited = self.open_editor(title, starting_point.as_deref().unwrap_or(""))?;
            return Ok(Some(edited));
        }

        Ok(if source.generate { starting_point } else { None })
    }

    async fn generate(&self, title: &str) -> Result<String> {
        let generator = self.generator.as_ref().ok_or(NewsError::MissingApiKey)?;
        info!("Requesting generated draft for '{}'", title);
        generator.generate(title).await
    }

    fn read_content_from_file(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(NewsError::FileNotFound {
                file_path: path.display().to_string(),
            });
        }
        read_to_string(path).map_err(NewsError::Io)
    }

    fn open_editor(&self, title: &str, existing_content: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        {
            let mut file = OpenOptions::new().write(true).open(&temp_path)?;
            writeln!(file, "<!--")?;
            writeln!(file, "Article: {}", title)?;
            writeln!(
                file,
                "Supported markdown: # / ## / ### headings, '* ' list items, **bold**, *italic*."
            )?;
            writeln!(file, "Comment lines are removed. Save and exit when done.")?;
            writeln!(file, "-->")?;
            writeln!(file, "{}", existing_content)?;
        }

        let editor_cmd = self.config.get_editor_command();
        info!("Opening editor to write article content. Save and exit when done...");
        launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(strip_editor_comments(&content))
    }

    async fn view_article(&self, id: &str, html: bool, json: bool) -> Result<()> {
        let article = self
            .store
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| NewsError::ArticleNotFound { id: id.to_string() })?;

        if json {
            println!("{}", serde_json::to_string_pretty(&article)?);
            return Ok(());
        }

        if html {
            let blocks = MarkdownRenderer::html().render(&article.content);
            println!("{}", to_html(&blocks));
            return Ok(());
        }

        println!("{}", console::style(&article.title).bold());
        println!(
            "By {} \u{2022} {}",
            console::style(&article.author).bold(),
            format_display_date(&article.created_at)
        );
        println!("Image: {}", article.display_image_url());
        println!();
        print_blocks(&terminal_renderer().render(&article.content));
        Ok(())
    }

    /// List articles in store order (newest first)
    async fn list_articles(&self, options: ListArticlesOptions) -> Result<()> {
        let mut articles = self.store.lock().await.articles().to_vec();
        if options.limit > 0 {
            articles.truncate(options.limit);
        }

        if options.json {
            println!("{}", serde_json::to_string_pretty(&articles)?);
            return Ok(());
        }

        self.display_articles(&articles, options.brief);
        Ok(())
    }

    async fn search_articles(&self, query: &str, limit: usize, json: bool) -> Result<()> {
        let mut results: Vec<Article> = self
            .store
            .lock()
            .await
            .search(query)
            .into_iter()
            .cloned()
            .collect();

        if limit > 0 {
            results.truncate(limit);
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else if results.is_empty() {
            println!("No articles found matching query: \"{}\"", query);
        } else {
            self.display_articles(&results, false);
        }
        Ok(())
    }

    fn display_articles(&self, articles: &[Article], brief: bool) {
        if articles.is_empty() {
            println!("No articles yet. Create one with `newsdesk create`.");
            return;
        }

        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, article) in articles.iter().enumerate() {
            if brief {
                println!("{}  {}", article.id, article.title);
                continue;
            }

            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            println!(
                "ID: {} | {} | {}",
                article.id,
                article.author,
                article.created_at.format("%Y-%m-%d")
            );
            println!("{}", console::style(&article.title).bold());
            println!("{}", content_snippet(&article.content, SNIPPET_LEN));
        }

        println!(
            "\n{} article{}",
            articles.len(),
            if articles.len() == 1 { "" } else { "s" }
        );
    }

    async fn delete_article(&self, id: &str, force: bool) -> Result<()> {
        let mut store = self.store.lock().await;

        let article = store
            .get(id)
            .cloned()
            .ok_or_else(|| NewsError::ArticleNotFound { id: id.to_string() })?;

        if !force {
            println!("You are about to delete the following article:");
            println!("ID:      {}", article.id);
            println!("Title:   {}", article.title);
            println!("Author:  {}", article.author);
            println!("Created: {}", format_display_date(&article.created_at));
            print!("\nAre you sure you want to delete this article? [y/N]: ");
            stdout().flush()?;

            let mut input = String::new();
            stdin().read_line(&mut input)?;
            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        store.delete(id);
        println!("Article '{}' ({}) has been deleted.", article.title, article.id);
        Ok(())
    }

    fn render_markdown(&self, file: Option<PathBuf>, html: bool) -> Result<()> {
        let input = match file {
            Some(path) => self.read_content_from_file(&path)?,
            None => {
                let mut buffer = String::new();
                stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };
        debug!("Rendering {} bytes of markdown", input.len());

        if html {
            println!("{}", to_html(&MarkdownRenderer::html().render(&input)));
        } else {
            print_blocks(&terminal_renderer().render(&input));
        }
        Ok(())
    }

    fn handle_config(&mut self, show: bool, set: Option<String>, reset: bool) -> Result<()> {
        let show = show || (set.is_none() && !reset);

        if reset {
            self.config = Config::default();
            self.config.save(&self.config_path)?;
            println!("Configuration reset to defaults");
        }

        if let Some(assignment) = set {
            self.config.set_value(&assignment)?;
            self.config.save(&self.config_path)?;
            println!("Configuration updated");
        }

        if show {
            let mut shown = self.config.clone();
            if shown.gemini_api_key.is_some() {
                shown.gemini_api_key = Some("********".to_string());
            }
            println!("# {}", self.config_path.display());
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn terminal_renderer() -> MarkdownRenderer {
    if console::colors_enabled() {
        MarkdownRenderer::ansi()
    } else {
        MarkdownRenderer::plain()
    }
}

/// Prints rendered blocks for a terminal
fn print_blocks(blocks: &[RenderedBlock]) {
    for block in blocks {
        match block {
            RenderedBlock::Heading { level: 1, text } => {
                println!("{}", console::style(text).bold().underlined())
            }
            RenderedBlock::Heading { text, .. } => println!("{}", console::style(text).bold()),
            RenderedBlock::ListItem(text) => println!("  \u{2022} {}", text),
            RenderedBlock::Paragraph(text) => println!("{}", text),
            RenderedBlock::Spacer => println!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::MemoryBackend;

    struct StaticGenerator(&'static str);

    #[async_trait]
    impl ContentGenerator for StaticGenerator {
        async fn generate(&self, title: &str) -> Result<String> {
            Ok(format!("## {}\n\n{}", title, self.0))
        }
    }

    fn seed() -> Vec<Article> {
        vec![Article::with_id(
            "seed",
            Utc.with_ymd_and_hms(2023, 10, 26, 10, 0, 0).unwrap(),
            ArticleDraft {
                title: "Seed".to_string(),
                content: "Seed body".to_string(),
                author: "Desk".to_string(),
                image_url: None,
            },
        )]
    }

    fn app(config_dir: &Path) -> (App<MemoryBackend>, Arc<Mutex<ArticleStore<MemoryBackend>>>) {
        let mut store = ArticleStore::new(MemoryBackend::new(), seed());
        store.load();
        let store = Arc::new(Mutex::new(store));
        let app = App::new(
            Arc::clone(&store),
            Config::default(),
            config_dir.join("config.json"),
            false,
        );
        (app, store)
    }

    fn content(text: &str) -> ContentSource {
        ContentSource {
            content: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_prepends_new_article() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, store) = app(dir.path());

        app.run(Commands::Create {
            title: "New Listing".to_string(),
            author: Some("Reporter".to_string()),
            image: None,
            source: content("Body"),
        })
        .await
        .unwrap();

        let store = store.lock().await;
        assert_eq!(store.len(), 2);
        assert_eq!(store.articles()[0].title, "New Listing");
        assert_eq!(store.articles()[1].id, "seed");
    }

    #[tokio::test]
    async fn test_create_uses_default_author_and_rejects_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, store) = app(dir.path());

        let result = app
            .run(Commands::Create {
                title: "No Author".to_string(),
                author: None,
                image: None,
                source: content("Body"),
            })
            .await;
        assert!(matches!(
            result,
            Err(NewsError::Validation { field: "Author" })
        ));
        assert_eq!(store.lock().await.len(), 1);

        app.config.default_author = Some("House Author".to_string());
        app.run(Commands::Create {
            title: "With Default".to_string(),
            author: None,
            image: None,
            source: content("Body"),
        })
        .await
        .unwrap();
        assert_eq!(store.lock().await.articles()[0].author, "House Author");
    }

    #[tokio::test]
    async fn test_create_with_generated_content() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store) = app(dir.path());
        let mut app = app.with_generator(Arc::new(StaticGenerator("Generated body.")));

        app.run(Commands::Create {
            title: "Airdrop Season".to_string(),
            author: Some("Bot".to_string()),
            image: None,
            source: ContentSource {
                generate: true,
                ..Default::default()
            },
        })
        .await
        .unwrap();

        assert_eq!(
            store.lock().await.articles()[0].content,
            "## Airdrop Season\n\nGenerated body."
        );
    }

    #[tokio::test]
    async fn test_generate_without_generator_needs_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app(dir.path());
        let result = app
            .run(Commands::Generate {
                title: "Anything".to_string(),
            })
            .await;
        assert!(matches!(result, Err(NewsError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_edit_preserves_id_and_creation_time() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, store) = app(dir.path());
        let before = store.lock().await.get("seed").cloned().unwrap();

        app.run(Commands::Edit {
            id: "seed".to_string(),
            title: Some("Seed, revised".to_string()),
            author: None,
            image: Some("https://example.com/a.png".to_string()),
            source: ContentSource::default(),
        })
        .await
        .unwrap();

        let store = store.lock().await;
        let after = store.get("seed").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.title, "Seed, revised");
        assert_eq!(after.content, before.content);
        assert_eq!(after.image_url.as_deref(), Some("https://example.com/a.png"));
    }

    #[tokio::test]
    async fn test_edit_unknown_article() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app(dir.path());
        let result = app
            .run(Commands::Edit {
                id: "nope".to_string(),
                title: None,
                author: None,
                image: None,
                source: content("x"),
            })
            .await;
        assert!(matches!(result, Err(NewsError::ArticleNotFound { .. })));
    }

    #[tokio::test]
    async fn test_edit_content_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let body = dir.path().join("body.md");
        std::fs::write(&body, "# From file").unwrap();
        let (mut app, store) = app(dir.path());

        app.run(Commands::Edit {
            id: "seed".to_string(),
            title: None,
            author: None,
            image: None,
            source: ContentSource {
                file: Some(body),
                ..Default::default()
            },
        })
        .await
        .unwrap();

        assert_eq!(store.lock().await.get("seed").unwrap().content, "# From file");
    }

    #[tokio::test]
    async fn test_forced_delete() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, store) = app(dir.path());

        app.run(Commands::Delete {
            id: "seed".to_string(),
            force: true,
        })
        .await
        .unwrap();
        assert!(store.lock().await.is_empty());

        let result = app
            .run(Commands::Delete {
                id: "seed".to_string(),
                force: true,
            })
            .await;
        assert!(matches!(result, Err(NewsError::ArticleNotFound { .. })));
    }

    #[tokio::test]
    async fn test_config_set_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app(dir.path());

        app.run(Commands::Config {
            show: false,
            set: Some("default_author=Night Desk".to_string()),
            reset: false,
        })
        .await
        .unwrap();

        let saved = Config::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(saved.default_author.as_deref(), Some("Night Desk"));
        assert_eq!(app.config().default_author.as_deref(), Some("Night Desk"));
    }
}
