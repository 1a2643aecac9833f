//! Command-line interface for the parser.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::agenda::Agenda;
use crate::batch::{collect_files, parse_agenda_files_with_progress, uid_from_path};
use crate::config::{validate_date, validate_uid};
use crate::convert::{decode_document, encoding_for_label, DocumentConverter, HtmlConverter};
use crate::error::{ParserError, Result};
use crate::question::parse_question_document;
use crate::yaml::{save_question_yaml, save_yaml};

/// LegCo Watch Parser - Parse council agendas and questions into YAML.
#[derive(Parser)]
#[command(name = "legcowatch-parser")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a converted agenda document.
    Agenda {
        /// HTML file of the agenda
        file: PathBuf,

        /// Document uid (default: the file name without extension)
        #[arg(short, long)]
        uid: Option<String>,

        /// Output directory (default: parsed/)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a single question document.
    Question {
        /// HTML file of the question
        file: PathBuf,

        /// Question uid (e.g., question-20131009-5-e)
        #[arg(short, long)]
        uid: String,

        /// Meeting date in d.m.yyyy format
        #[arg(short, long)]
        date: String,

        /// The question is urgent
        #[arg(long)]
        urgent: bool,

        /// The question gets a written reply
        #[arg(long)]
        written: bool,

        /// Subject as given by the question listing
        #[arg(long)]
        subject: Option<String>,

        /// Link to the published reply
        #[arg(long)]
        reply_link: Option<String>,

        /// Character encoding of the file (default: from <meta charset>, else UTF-8)
        #[arg(short, long)]
        encoding: Option<String>,

        /// Output directory (default: parsed/)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse every agenda document in a directory.
    Batch {
        /// Directory with converted agenda documents
        dir: PathBuf,

        /// Output directory (default: parsed/)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Agenda { file, uid, output } => {
            agenda_command(&file, uid.as_deref(), output.as_deref())
        }
        Commands::Question {
            file,
            uid,
            date,
            urgent,
            written,
            subject,
            reply_link,
            encoding,
            output,
        } => question_command(
            &file,
            &QuestionArgs {
                uid: &uid,
                date: &date,
                urgent,
                written,
                subject: subject.as_deref(),
                reply_link: reply_link.as_deref(),
                encoding: encoding.as_deref(),
            },
            output.as_deref(),
        ),
        Commands::Batch { dir, output } => batch_command(&dir, output.as_deref()),
    }
}

/// Check that an output directory, if given, exists and is a directory.
fn check_output_dir(output: Option<&Path>) -> Result<()> {
    let Some(output_dir) = output else {
        return Ok(());
    };
    if !output_dir.exists() {
        return Err(ParserError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Output directory does not exist: {}", output_dir.display()),
        )));
    }
    if !output_dir.is_dir() {
        return Err(ParserError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", output_dir.display()),
        )));
    }
    Ok(())
}

fn print_agenda_summary(agenda: &Agenda) {
    println!("  Language: {}", agenda.language);
    println!("  Sections: {}", agenda.headers().len());
    if let Some(papers) = &agenda.tabled_papers {
        println!("  Tabled papers: {}", papers.len());
    }
    if let Some(questions) = &agenda.questions {
        println!("  Questions: {}", questions.len());
    }
    if !agenda.warnings.is_empty() {
        println!("  Warnings: {}", style(agenda.warnings.len()).yellow().bold());
    }
}

/// Execute the agenda command.
fn agenda_command(file: &Path, uid: Option<&str>, output: Option<&Path>) -> Result<()> {
    let uid = match uid {
        Some(uid) => uid.to_string(),
        None => uid_from_path(file)
            .ok_or_else(|| ParserError::InvalidUid(file.display().to_string()))?,
    };

    // Validate inputs before reading anything
    validate_uid(&uid)?;
    check_output_dir(output)?;

    println!("{} {}", style("Parsing").bold(), style(&uid).cyan());

    let markup = HtmlConverter.convert(file)?;
    let agenda = Agenda::parse(&uid, &markup)?;
    print_agenda_summary(&agenda);

    let output_path = save_yaml(&agenda, output)?;

    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output_path.display()
    );

    Ok(())
}

/// Listing data passed on the command line for a question.
struct QuestionArgs<'a> {
    uid: &'a str,
    date: &'a str,
    urgent: bool,
    written: bool,
    subject: Option<&'a str>,
    reply_link: Option<&'a str>,
    encoding: Option<&'a str>,
}

/// Execute the question command.
fn question_command(file: &Path, args: &QuestionArgs<'_>, output: Option<&Path>) -> Result<()> {
    validate_uid(args.uid)?;
    let date = validate_date(args.date)?;
    let encoding = args.encoding.map(encoding_for_label).transpose()?;
    check_output_dir(output)?;

    println!(
        "{} {} for meeting {}",
        style("Parsing").bold(),
        style(args.uid).cyan(),
        style(date).green()
    );

    // Question documents are read as they are; they need no conversion.
    let markup = decode_document(&fs::read(file)?, encoding, &file.display().to_string());
    let question = parse_question_document(
        args.uid,
        date,
        args.urgent,
        !args.written,
        &markup,
        args.subject,
        args.reply_link,
    )?;

    println!("  Subject: {}", style(&question.subject).green());
    if let Some(asker) = &question.asker {
        println!("  Asker: {asker}");
    }
    println!("  Repliers: {}", question.repliers.len());
    if !question.warnings.is_empty() {
        println!(
            "  Warnings: {}",
            style(question.warnings.len()).yellow().bold()
        );
    }

    let output_path = save_question_yaml(&question, output)?;

    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output_path.display()
    );

    Ok(())
}

/// Execute the batch command.
fn batch_command(dir: &Path, output: Option<&Path>) -> Result<()> {
    check_output_dir(output)?;

    let files = collect_files(dir, &HtmlConverter)?;
    println!(
        "{} {} documents in {}",
        style("Parsing").bold(),
        style(files.len()).cyan(),
        dir.display()
    );

    let pb = ProgressBar::new(files.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let report = parse_agenda_files_with_progress(&files, &HtmlConverter, |path| {
        if let Some(name) = path.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        pb.inc(1);
    });

    pb.set_message("Saving YAML...");
    let mut saved = 0;
    for agenda in &report.agendas {
        match save_yaml(agenda, output) {
            Ok(_) => saved += 1,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        }
    }
    pb.finish_and_clear();

    println!();
    println!("  Parsed: {}", style(saved).green());
    if report.warning_count() > 0 {
        println!(
            "  Warnings: {}",
            style(report.warning_count()).yellow().bold()
        );
    }
    if !report.failures.is_empty() {
        println!("  Failed: {}", style(report.failures.len()).red().bold());
        for failure in &report.failures {
            println!("    {}: {}", style(&failure.uid).red(), failure.error);
        }
    }

    Ok(())
}
