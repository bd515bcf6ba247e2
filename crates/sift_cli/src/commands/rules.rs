//! Rules command - lists the loaded detection rules.

use console::style;
use sift_core::prelude::*;

use crate::RulesArgs;
use crate::ui::{colors, print_command_header, truncate_with_ellipsis};

const LIBRARY_TRUNCATE_WIDTH: usize = 40;

/// Executes the `sift rules` command.
pub fn run(args: &RulesArgs) -> super::Result {
    print_command_header("rules");

    let config = super::load_config(args.config.as_deref())?;
    let rules_dir = args.rules.as_deref().unwrap_or(&config.rules_dir);
    let loaded = super::load_rules_with_warnings(rules_dir)?;
    let rule_set = RuleSet::new(loaded.rules);

    let rules: Vec<&Rule> = rule_set
        .iter()
        .filter(|r| matches_language(r, args.language.as_deref()))
        .collect();

    if rules.is_empty() {
        print_no_matches(args.language.as_deref());
        return Ok(());
    }

    println!(
        "{}",
        colors::muted().apply_to(format!("{} rules from '{}'", rules.len(), rules_dir.display()))
    );

    for language in rule_set.languages() {
        let in_language: Vec<&&Rule> = rules.iter().filter(|r| r.language.as_ref() == language).collect();
        if in_language.is_empty() {
            continue;
        }

        println!();
        println!("{}", style(language).bold());

        for rule in in_language {
            if args.verbose {
                print_rule_detail(rule);
            } else {
                print_rule_row(rule);
            }
        }
    }

    Ok(())
}

fn matches_language(rule: &Rule, filter: Option<&str>) -> bool {
    filter.is_none_or(|language| rule.language.eq_ignore_ascii_case(language))
}

fn print_no_matches(language: Option<&str>) {
    match language {
        Some(language) => println!(
            "{} {} {}",
            colors::muted().apply_to("○"),
            colors::secondary().apply_to("no rules match"),
            colors::emphasis().apply_to(format!("--language {language}"))
        ),
        None => println!(
            "{} {}",
            colors::muted().apply_to("○"),
            colors::secondary().apply_to("no rules")
        ),
    }
}

fn print_rule_row(rule: &Rule) {
    println!(
        "  {}  {}",
        colors::accent().apply_to(&rule.name),
        colors::secondary().apply_to(truncate_with_ellipsis(&rule.library, LIBRARY_TRUNCATE_WIDTH))
    );
}

fn print_rule_detail(rule: &Rule) {
    println!();
    println!(
        "  {} {} {}",
        style(&*rule.name).bold(),
        colors::muted().apply_to("·"),
        colors::muted().apply_to(&rule.library)
    );
    println!(
        "    {} {}",
        colors::muted().apply_to("pattern"),
        colors::secondary().apply_to(rule.pattern())
    );

    if !rule.example.is_empty() {
        println!(
            "    {} {}",
            colors::muted().apply_to("example"),
            colors::secondary().apply_to(&rule.example)
        );
    }
}
