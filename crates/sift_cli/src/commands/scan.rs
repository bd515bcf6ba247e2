//! Scan command - matches the loaded rules against a corpus.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use sift_core::prelude::*;

use crate::output::{JsonLinesReporter, TextReporter};
use crate::ui::{self, colors, exit, format_duration, indicators, pluralise_word, print_command_header};
use crate::{OutputFormat, ScanArgs};

/// Executes the `sift scan` command.
pub fn run(args: &ScanArgs) -> super::Result {
    configure_thread_pool(args.concurrency)?;

    let interactive = args.output.is_none() && matches!(args.format, OutputFormat::Text);
    let start = Instant::now();

    if interactive {
        print_command_header("scan");
    }

    let config = super::load_config(args.config.as_deref())?;
    let registry = config.language_registry();

    let rules_dir = args.rules.as_deref().unwrap_or(&config.rules_dir);
    let loaded = super::load_rules_with_warnings(rules_dir)?;

    if loaded.rules.is_empty() {
        anyhow::bail!("no valid detection rules in '{}'", rules_dir.display());
    }

    let rule_set = RuleSet::new(loaded.rules);

    let options = CorpusOptions {
        excludes: collect_excludes(&config, args),
        respect_gitignore: config.respect_gitignore && !args.skip_gitignore,
    };
    let corpus = CorpusIndex::discover(&args.path, &registry, &options)?;

    if interactive && args.verbose > 0 {
        print_verbose_context(&rule_set, &corpus, args);
    }

    let scanner = build_scanner(rule_set, args.max_file_size.or(config.max_file_size));
    let stats = write_detections(args, &scanner, &corpus)?;

    if interactive {
        print_summary(&stats, corpus.len(), start.elapsed());
    }

    if args.fail_on_detect && stats.detections > 0 {
        std::process::exit(exit::DETECTIONS);
    }

    Ok(())
}

/// Configures the global rayon thread pool with the requested number of
/// threads, if specified.
fn configure_thread_pool(concurrency: Option<usize>) -> super::Result {
    if let Some(n) = concurrency {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("failed to configure thread pool")?;
    }
    Ok(())
}

fn collect_excludes(config: &Config, args: &ScanArgs) -> Vec<String> {
    config
        .exclude_paths
        .iter()
        .chain(args.exclude.iter())
        .cloned()
        .collect()
}

fn build_scanner(rules: RuleSet, max_file_size: Option<u64>) -> Scanner {
    let mut scanner = Scanner::new(rules);

    if let Some(bytes) = max_file_size {
        scanner = scanner.with_max_file_size(bytes);
    }

    scanner
}

fn write_detections(args: &ScanArgs, scanner: &Scanner, corpus: &CorpusIndex) -> super::Result<ScanStats> {
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            let stats = scan_into(scanner, corpus, args.format, &mut writer, true);
            writer.flush()?;
            Ok(stats)
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            let stats = scan_into(scanner, corpus, args.format, &mut stdout, false);
            stdout.flush()?;
            Ok(stats)
        }
    }
}

fn scan_into(
    scanner: &Scanner,
    corpus: &CorpusIndex,
    format: OutputFormat,
    writer: &mut dyn Write,
    plain: bool,
) -> ScanStats {
    match format {
        OutputFormat::Text => {
            let mut reporter = TextReporter::new(writer, plain);
            scanner.scan(corpus, &mut reporter)
        }
        OutputFormat::Json => {
            let mut reporter = JsonLinesReporter::new(writer);
            scanner.scan(corpus, &mut reporter)
        }
    }
}

fn print_verbose_context(rules: &RuleSet, corpus: &CorpusIndex, args: &ScanArgs) {
    ui::print_info(&format!(
        "{} {} across {} {}",
        rules.len(),
        pluralise_word(rules.len(), "rule", "rules"),
        rules.languages().count(),
        pluralise_word(rules.languages().count(), "language", "languages"),
    ));
    ui::print_info(&format!(
        "{} {} under '{}'",
        corpus.len(),
        pluralise_word(corpus.len(), "corpus file", "corpus files"),
        args.path.display(),
    ));
}

fn print_summary(stats: &ScanStats, file_count: usize, elapsed: Duration) {
    println!();

    if stats.detections == 0 {
        println!("{} no secrets detected", colors::success().apply_to(indicators::SUCCESS));
    } else {
        println!(
            "{} {} {}",
            colors::error().apply_to(indicators::ERROR),
            colors::emphasis().apply_to(stats.detections),
            pluralise_word(stats.detections, "detection", "detections"),
        );
    }

    let mut breakdown = format!(
        "  {file_count} {} scanned with {} {} in {}",
        pluralise_word(file_count, "file", "files"),
        stats.rules_applied,
        pluralise_word(stats.rules_applied, "rule", "rules"),
        format_duration(elapsed),
    );
    if stats.files_skipped > 0 {
        breakdown.push_str(&format!(" ({} skipped)", stats.files_skipped));
    }
    println!("{}", colors::muted().apply_to(breakdown));
    println!();
}
