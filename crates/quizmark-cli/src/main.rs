use clap::{Args, Parser, Subcommand};
use quizmark_codegen::{
    render_preview, KatexRenderer, MathmlRenderer, OmmlOptions, OmmlRenderer, Render,
};
use quizmark_store::{
    normalize_image, save_as, DirStorage, Repository, Selectors, Snapshot, StoreConfig,
};
use std::io::Read;
use std::path::{Path, PathBuf};

mod logger;

#[derive(Parser)]
#[command(name = "quizmark")]
#[command(about = "Quizmark: LaTeX formulas to OMML/MathML, and a tagged question store")]
#[command(version)]
struct Cli {
    /// More log output (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// JSON store settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Formula markup given inline, from a file, or on stdin.
#[derive(Args)]
struct Input {
    /// Markup text (reads stdin if neither this nor --file is given)
    text: Option<String>,

    /// Read markup from a file
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a formula to OMML
    Omml {
        #[command(flatten)]
        input: Input,

        /// Wrap in m:oMathPara (display math)
        #[arg(long)]
        paragraph: bool,

        /// Declare the xmlns:m namespace
        #[arg(long)]
        namespace: bool,
    },

    /// Convert a formula to MathML
    Mathml {
        #[command(flatten)]
        input: Input,
    },

    /// Print the parsed math tree as JSON
    Tree {
        #[command(flatten)]
        input: Input,
    },

    /// Render question text with inline $...$ formulas through KaTeX
    Preview {
        #[command(flatten)]
        input: Input,
    },

    /// List questions matching tag selectors
    Filter {
        /// Store directory
        #[arg(long)]
        store: Option<PathBuf>,

        /// JSON file mapping tag ids to selectors
        #[arg(long)]
        selectors: PathBuf,
    },

    /// Write all tags and questions to a JSON file
    Export {
        #[arg(long)]
        store: Option<PathBuf>,

        /// Output file name inside the export directory
        #[arg(long, default_value = "quizmark-export.json")]
        out: String,
    },

    /// Load tags and questions from an export file
    Import {
        #[arg(long)]
        store: Option<PathBuf>,

        /// Export file to read
        path: PathBuf,

        /// Keep existing records and add only new ids
        #[arg(long)]
        merge: bool,
    },

    /// Attach an image to a question
    Attach {
        #[arg(long)]
        store: Option<PathBuf>,

        /// Question id
        question: String,

        /// Image file
        image: PathBuf,
    },

    /// Shrink an image and re-encode it as JPEG
    Image {
        input: PathBuf,
        output: PathBuf,

        /// Longest side in pixels
        #[arg(long)]
        max_size: Option<u32>,

        /// JPEG quality (1-100)
        #[arg(long)]
        quality: Option<u8>,
    },
}

fn main() {
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.verbose, cli.quiet));

    let config = match &cli.config {
        Some(path) => StoreConfig::from_json_file(path).unwrap_or_else(|e| fail(e)),
        None => StoreConfig::default(),
    };

    match cli.command {
        Command::Omml {
            input,
            paragraph,
            namespace,
        } => cmd_render(
            &OmmlRenderer::new(OmmlOptions {
                paragraph,
                namespace,
            }),
            &input,
        ),
        Command::Mathml { input } => cmd_render(&MathmlRenderer, &input),
        Command::Tree { input } => cmd_tree(&input),
        Command::Preview { input } => cmd_preview(&input),
        Command::Filter { store, selectors } => cmd_filter(&open_store(store, &config), &selectors),
        Command::Export { store, out } => cmd_export(&open_store(store, &config), &config, &out),
        Command::Import { store, path, merge } => {
            cmd_import(&mut open_store(store, &config), &path, merge)
        }
        Command::Attach {
            store,
            question,
            image,
        } => cmd_attach(&mut open_store(store, &config), &question, &image),
        Command::Image {
            input,
            output,
            max_size,
            quality,
        } => cmd_image(
            &input,
            &output,
            max_size.unwrap_or(config.max_image_size),
            quality.unwrap_or(config.jpeg_quality),
        ),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn read_file(path: &Path) -> String {
    if !path.exists() {
        fail(format!("file not found: {}", path.display()));
    }
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading {}: {e}", path.display())))
}

fn read_input(input: &Input) -> String {
    match (&input.text, &input.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_file(path),
        (None, None) => {
            let mut text = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut text) {
                fail(format!("reading stdin: {e}"));
            }
            text
        }
    }
}

fn open_store(store: Option<PathBuf>, config: &StoreConfig) -> Repository<DirStorage> {
    let root = store.unwrap_or_else(|| config.root.clone());
    let mut repo = Repository::try_open(DirStorage::new(root)).unwrap_or_else(|e| fail(e));
    repo.configure(config);
    repo
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(e),
    }
}

fn cmd_render(renderer: &dyn Render, input: &Input) {
    let markup = read_input(input);
    match renderer.render(markup.trim_end_matches('\n')) {
        Ok(out) => println!("{out}"),
        Err(e) => fail(e),
    }
}

fn cmd_tree(input: &Input) {
    let nodes = quizmark_math::parse(&read_input(input));
    print_json(&nodes);
}

fn cmd_preview(input: &Input) {
    let text = read_input(input);
    let preview = render_preview(text.trim_end_matches('\n'), &KatexRenderer::default());
    if let Some(notice) = &preview.notice {
        eprintln!("{}: {}", notice.title, notice.description);
    }
    println!("{}", preview.html);
}

fn cmd_filter(repo: &Repository<DirStorage>, selectors_path: &Path) {
    let selectors: Selectors = serde_json::from_str(&read_file(selectors_path))
        .unwrap_or_else(|e| fail(format!("{}: {e}", selectors_path.display())));
    let found = repo.filter(&selectors);
    log::info!("{} of {} questions match", found.len(), repo.questions().len());
    print_json(&found);
}

fn cmd_export(repo: &Repository<DirStorage>, config: &StoreConfig, out: &str) {
    let json = match serde_json::to_string_pretty(&repo.export()) {
        Ok(json) => json,
        Err(e) => fail(e),
    };
    let path = save_as(json, out, &config.export_dir).unwrap_or_else(|e| fail(e));
    eprintln!("Exported: {}", path.display());
}

fn cmd_import(repo: &mut Repository<DirStorage>, path: &Path, merge: bool) {
    let snapshot: Snapshot = serde_json::from_str(&read_file(path))
        .unwrap_or_else(|e| fail(format!("{}: {e}", path.display())));

    if merge {
        let report = repo.merge(snapshot);
        eprintln!(
            "Merged: {} tags, {} questions added",
            report.tags, report.questions
        );
    } else {
        let (tags, questions) = (snapshot.tags.len(), snapshot.questions.len());
        repo.replace_all(snapshot);
        eprintln!("Imported: {tags} tags, {questions} questions");
    }

    // Mutations only log write failures; surface them here
    if !repo.persist() {
        fail(format!("could not write store at {}", repo.storage().root().display()));
    }
}

fn cmd_attach(repo: &mut Repository<DirStorage>, question: &str, image: &Path) {
    let bytes = std::fs::read(image)
        .unwrap_or_else(|e| fail(format!("reading {}: {e}", image.display())));
    match repo.attach_image(question, &bytes) {
        Ok(true) => {}
        Ok(false) => fail(format!("no question with id {question}")),
        Err(e) => fail(e),
    }
    if !repo.persist() {
        fail(format!("could not write store at {}", repo.storage().root().display()));
    }
    eprintln!("Attached: {} to {question}", image.display());
}

fn cmd_image(input: &Path, output: &Path, max_size: u32, quality: u8) {
    let bytes = std::fs::read(input)
        .unwrap_or_else(|e| fail(format!("reading {}: {e}", input.display())));
    let jpeg = normalize_image(&bytes, max_size, quality).unwrap_or_else(|e| fail(e));
    if let Err(e) = std::fs::write(output, &jpeg) {
        fail(format!("writing {}: {e}", output.display()));
    }
    eprintln!("Wrote: {} ({} bytes)", output.display(), jpeg.len());
}
