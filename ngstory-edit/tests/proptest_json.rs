//! Property-based tests for workspace mutation.
//!
//! These tests verify that:
//! - Applying the same add-on entry twice yields the same document as applying it once
//! - Projects other than the target are never changed
//! - Top-level and project key order survive a mutation

use ngstory_domain::{EntryRequest, plan_addon_entry};
use ngstory_edit::LoadedWorkspace;
use ngstory_types::{AddonEntry, Variant};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

fn arb_project_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,10}"
}

fn arb_variant() -> impl Strategy<Value = Variant> {
    prop_oneof![Just(Variant::Webpack4), Just(Variant::Webpack5)]
}

/// Strategy to generate workspaces with 1..5 uniquely named projects.
fn arb_workspace() -> impl Strategy<Value = (Vec<String>, String)> {
    prop::collection::btree_set(arb_project_name(), 1..5).prop_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let mut projects = Map::new();
        for (i, name) in names.iter().enumerate() {
            let root = if i == 0 {
                String::new()
            } else {
                format!("projects/{name}")
            };
            projects.insert(
                name.clone(),
                json!({
                    "root": root,
                    "projectType": if i % 2 == 0 { "application" } else { "library" },
                    "architect": { "build": { "builder": "b", "options": { "n": i } } }
                }),
            );
        }
        let doc = json!({ "version": 1, "projects": projects, "cli": { "analytics": false } });
        let text = serde_json::to_string_pretty(&doc).expect("serialize");
        (names, text)
    })
}

fn entry(project: &str, variant: Variant, count: usize) -> AddonEntry {
    plan_addon_entry(&EntryRequest {
        project,
        root: "",
        config_folder: ".storybook",
        variant,
        use_compodoc: false,
        project_count: count,
    })
}

proptest! {
    #[test]
    fn add_entries_is_idempotent(
        (names, text) in arb_workspace(),
        pick in any::<prop::sample::Index>(),
        variant in arb_variant(),
    ) {
        let target = pick.get(&names).clone();
        let e = entry(&target, variant, names.len());

        let once = LoadedWorkspace::parse("angular.json".into(), text)
            .unwrap()
            .add_entries(&target, &e)
            .unwrap();
        let twice = LoadedWorkspace::parse("angular.json".into(), once.rendered().to_string())
            .unwrap()
            .add_entries(&target, &e)
            .unwrap();

        prop_assert_eq!(once.rendered(), twice.rendered());
        prop_assert!(!twice.has_changes());
    }

    #[test]
    fn other_projects_are_untouched(
        (names, text) in arb_workspace(),
        pick in any::<prop::sample::Index>(),
        variant in arb_variant(),
    ) {
        let target = pick.get(&names).clone();
        let before: Value = serde_json::from_str(&text).unwrap();

        let mutated = LoadedWorkspace::parse("angular.json".into(), text)
            .unwrap()
            .add_entries(&target, &entry(&target, variant, names.len()))
            .unwrap();
        let after: Value = serde_json::from_str(mutated.rendered()).unwrap();

        for name in names.iter().filter(|n| **n != target) {
            prop_assert_eq!(&after["projects"][name], &before["projects"][name]);
        }
        prop_assert_eq!(&after["cli"], &before["cli"]);
        prop_assert_eq!(&after["version"], &before["version"]);

        let summaries = mutated.list_projects();
        prop_assert_eq!(summaries.iter().filter(|p| p.has_addon).count(), 1);
    }

    #[test]
    fn key_order_survives(
        (names, text) in arb_workspace(),
        pick in any::<prop::sample::Index>(),
    ) {
        let target = pick.get(&names).clone();
        let mutated = LoadedWorkspace::parse("angular.json".into(), text)
            .unwrap()
            .add_entries(&target, &entry(&target, Variant::Webpack5, names.len()))
            .unwrap();
        let after: Value = serde_json::from_str(mutated.rendered()).unwrap();

        let top: Vec<&String> = after.as_object().unwrap().keys().collect();
        prop_assert_eq!(top, vec!["version", "projects", "cli"]);

        let listed: Vec<String> = mutated.list_projects().into_iter().map(|p| p.name).collect();
        prop_assert_eq!(listed, names);
    }
}
