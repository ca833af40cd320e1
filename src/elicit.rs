//! Elicitation: build a resolved value tree by asking the operator.
//!
//! The walk is depth-first in key order and strictly sequential; each leaf
//! blocks until the prompter returns an acceptable answer. Answers that fail
//! coercion or validation are rejected and the same question is asked again.

use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::coerce::coerce;
use crate::error::AskfigError;
use crate::prompt::Prompter;
use crate::schema::{ConfigNode, ConfigTree, ItemDescriptor};
use crate::types::{ValueType, render_value};

/// Resolve every leaf of `tree`.
///
/// With `assume_default`, nothing is asked: items take their default and
/// items without one are left out of the result.
pub fn elicit(
    tree: &ConfigTree,
    prompter: &mut dyn Prompter,
    assume_default: bool,
) -> Result<Mapping, AskfigError> {
    info!(items = count_items(tree), assume_default, "eliciting configuration");
    elicit_at(tree, prompter, assume_default, "")
}

fn elicit_at(
    tree: &ConfigTree,
    prompter: &mut dyn Prompter,
    assume_default: bool,
    prefix: &str,
) -> Result<Mapping, AskfigError> {
    let mut resolved = Mapping::new();
    for (key, node) in tree {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let value = match node {
            ConfigNode::Tree(sub) => {
                Value::Mapping(elicit_at(sub, prompter, assume_default, &dotted)?)
            }
            ConfigNode::Item(item) if assume_default => match &item.default {
                Some(d) => d.clone(),
                None => {
                    debug!(key = %dotted, "no default; leaving unset");
                    continue;
                }
            },
            ConfigNode::Item(item) => ask_item(item, prompter)?,
        };
        resolved.insert(Value::String(key.clone()), value);
    }
    Ok(resolved)
}

/// Ask for one item until an acceptable answer arrives.
pub fn ask_item(item: &ItemDescriptor, prompter: &mut dyn Prompter) -> Result<Value, AskfigError> {
    if let Some(choices) = &item.choices {
        let labels: Vec<String> = choices.iter().map(render_value).collect();
        let default = item
            .default
            .as_ref()
            .and_then(|d| choices.iter().position(|c| c == d));
        loop {
            let index = prompter.ask_choice(&item.question, &labels, default)?;
            match choices.get(index) {
                Some(choice) if item.accepts(choice) => return Ok(choice.clone()),
                Some(_) => prompter.reject(&format!("{} is not accepted", labels[index]))?,
                None => prompter.reject("Please pick one of the listed choices.")?,
            }
        }
    }

    if item.value_type == ValueType::Boolean {
        let default = item.default.as_ref().and_then(Value::as_bool);
        return Ok(Value::Bool(prompter.ask_yes_no(&item.question, default)?));
    }

    let shown = item.default.as_ref().map(render_value);
    loop {
        let raw = prompter.ask_text(&item.question, shown.as_deref())?;
        let candidate = match &item.default {
            Some(d) if raw.is_empty() => d.clone(),
            _ => match coerce(&raw, &item.value_type) {
                Ok(v) => v,
                Err(reason) => {
                    prompter.reject(&reason)?;
                    continue;
                }
            },
        };
        if item.accepts(&candidate) {
            return Ok(candidate);
        }
        let reason = match item.range {
            Some(bound) => format!("{} is outside {bound}", render_value(&candidate)),
            None => format!("{} is not accepted", render_value(&candidate)),
        };
        prompter.reject(&reason)?;
    }
}

fn count_items(tree: &ConfigTree) -> usize {
    tree.values()
        .map(|node| match node {
            ConfigNode::Item(_) => 1,
            ConfigNode::Tree(sub) => count_items(sub),
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl;
    use crate::prompt::TerminalPrompter;
    use crate::schema::{Decl, Schema, compile};
    use std::io::Cursor;

    type Scripted = TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>>;

    fn scripted(input: &str) -> Scripted {
        TerminalPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn run(schema: Schema, input: &str) -> (Result<Mapping, AskfigError>, String) {
        let tree = compile("Acme::NetServer", &schema).unwrap();
        let mut p = scripted(input);
        let result = elicit(&tree, &mut p, false);
        (result, String::from_utf8(p.into_output()).unwrap())
    }

    #[test]
    fn out_of_range_answer_reprompts() {
        let (result, out) = run(
            Schema::new().item("port", decl![1..65535, "port number"]),
            "70000\n8080\n",
        );
        let values = result.unwrap();
        assert_eq!(values.get("port"), Some(&Value::from(8080)));
        assert_eq!(out.matches("port number (1..65535): ").count(), 2);
        assert!(out.contains("70000 is outside 1..65535"));
    }

    #[test]
    fn uncoercible_answer_reprompts() {
        let (result, out) = run(
            Schema::new().item("port", decl![1..65535, "port"]),
            "http\n443\n",
        );
        assert_eq!(result.unwrap().get("port"), Some(&Value::from(443)));
        assert!(out.contains("expected an integer, got 'http'"));
    }

    #[test]
    fn choices_accept_only_members() {
        let schema = Schema::new().item("color", decl![["red", "green", "blue"], "pick one"]);
        let (result, out) = run(schema, "purple\ngreen\n");
        assert_eq!(result.unwrap().get("color"), Some(&Value::from("green")));
        assert!(out.contains("Please pick one of the listed choices."));
    }

    #[test]
    fn numeric_choices_store_the_typed_member() {
        let schema = Schema::new().item("workers", decl![vec![1, 2, 4, 8], "workers"]);
        let (result, out) = run(schema, "4\n");
        assert_eq!(result.unwrap().get("workers"), Some(&Value::from(4)));
        assert!(out.contains("  3) 4\n  4) 8\n"));
    }

    #[test]
    fn choice_validator_applies() {
        let schema = Schema::new().item(
            "size",
            decl![vec![1, 2, 3], "size", Decl::validator(|v| v.as_i64() != Some(2))],
        );
        let (result, out) = run(schema, "2\n3\n");
        assert_eq!(result.unwrap().get("size"), Some(&Value::from(3)));
        assert!(out.contains("2 is not accepted"));
    }

    #[test]
    fn boolean_prefilled_with_default() {
        let (result, out) = run(Schema::new().item("enabled", decl![true, "enable?"]), "\n");
        assert_eq!(result.unwrap().get("enabled"), Some(&Value::Bool(true)));
        assert_eq!(out, "enable? [Y/n] ");
    }

    #[test]
    fn empty_answer_takes_default() {
        let (result, out) = run(Schema::new().item("host", decl!["localhost", "host"]), "\n");
        assert_eq!(result.unwrap().get("host"), Some(&Value::from("localhost")));
        assert_eq!(out, "host [localhost]: ");
    }

    #[test]
    fn nested_trees_walk_depth_first_in_key_order() {
        let schema = Schema::new()
            .item("b_top", decl![ValueType::Text, "b_top"])
            .section(
                "a_db",
                Schema::new()
                    .item("host", decl![ValueType::Text, "host"])
                    .item("port", decl![ValueType::Integer, "port"]),
            );
        let (result, out) = run(schema, "db1\n5432\ntop\n");
        let values = result.unwrap();
        let db = values.get("a_db").and_then(Value::as_mapping).unwrap();
        assert_eq!(db.get("host"), Some(&Value::from("db1")));
        assert_eq!(db.get("port"), Some(&Value::from(5432)));
        assert_eq!(values.get("b_top"), Some(&Value::from("top")));
        assert_eq!(out, "host: port: b_top: ");
    }

    #[test]
    fn assume_default_never_prompts() {
        let schema = Schema::new()
            .item("host", decl!["localhost"])
            .item("user", decl![ValueType::Text])
            .section("db", Schema::new().item("pool", decl![4]));
        let tree = compile("Owner", &schema).unwrap();
        let mut p = scripted("");
        let values = elicit(&tree, &mut p, true).unwrap();
        assert_eq!(values.get("host"), Some(&Value::from("localhost")));
        assert!(values.get("user").is_none());
        let db = values.get("db").and_then(Value::as_mapping).unwrap();
        assert_eq!(db.get("pool"), Some(&Value::from(4)));
        assert!(p.into_output().is_empty());
    }

    #[test]
    fn closed_input_aborts_the_walk() {
        let (result, _) = run(Schema::new().item("port", decl![1..65535, "port"]), "70000\n");
        assert!(matches!(result, Err(AskfigError::PromptClosed(_))));
    }
}
