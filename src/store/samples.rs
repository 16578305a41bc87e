//! Built-in sample catalog served when no data directory exists.

use super::registry::StaticFetcher;
use crate::types::{ComponentRecord, LibraryInfo};

fn record(path: &str, name: &str, kind: &str, description: &str) -> ComponentRecord {
    ComponentRecord::new(path, name)
        .with_kind(kind)
        .with_description(description)
}

/// Sample libraries with the same records for every version.
pub fn sample_catalog() -> Vec<(LibraryInfo, StaticFetcher)> {
    vec![
        (
            LibraryInfo {
                name: "react".into(),
                description: Some("A JavaScript library for building user interfaces".into()),
                website: Some("https://reactjs.org".into()),
                repository: Some("https://github.com/facebook/react".into()),
                versions: vec![
                    "18.2.0".into(),
                    "18.1.0".into(),
                    "17.0.2".into(),
                    "16.14.0".into(),
                ],
                latest_version: "18.2.0".into(),
            },
            StaticFetcher::uniform(vec![
                record(
                    "hooks/useState",
                    "useState",
                    "hook",
                    "Declares a state variable that you can update directly.",
                ),
                record(
                    "hooks/useEffect",
                    "useEffect",
                    "hook",
                    "Synchronizes a component with an external system.",
                ),
                record(
                    "hooks/useContext",
                    "useContext",
                    "hook",
                    "Reads and subscribes to context from your component.",
                ),
                record(
                    "component/Component",
                    "React.Component",
                    "class",
                    "Base class for React components defined as JavaScript classes.",
                ),
                record(
                    "component/Fragment",
                    "React.Fragment",
                    "component",
                    "Groups elements without a wrapper node.",
                ),
            ]),
        ),
        (
            LibraryInfo {
                name: "vue".into(),
                description: Some("Progressive JavaScript Framework".into()),
                website: Some("https://vuejs.org".into()),
                repository: Some("https://github.com/vuejs/vue".into()),
                versions: vec!["3.3.4".into(), "3.2.47".into(), "2.7.14".into()],
                latest_version: "3.3.4".into(),
            },
            StaticFetcher::uniform(vec![
                record(
                    "reactivity/ref",
                    "ref",
                    "reactivity",
                    "Takes an inner value and returns a reactive and mutable ref object.",
                ),
                record(
                    "reactivity/computed",
                    "computed",
                    "reactivity",
                    "Returns a readonly reactive ref object for the getter's returned value.",
                ),
                record(
                    "reactivity/watch",
                    "watch",
                    "reactivity",
                    "Watches one or more reactive data sources and invokes a callback.",
                ),
                record(
                    "component/defineComponent",
                    "defineComponent",
                    "component",
                    "A type helper for defining a Vue component with type inference.",
                ),
                record(
                    "component/defineProps",
                    "defineProps",
                    "component",
                    "Declares props in script setup.",
                ),
            ]),
        ),
        (
            LibraryInfo {
                name: "angular".into(),
                description: Some(
                    "Angular is a platform for building mobile and desktop web applications"
                        .into(),
                ),
                website: Some("https://angular.io".into()),
                repository: Some("https://github.com/angular/angular".into()),
                versions: vec!["16.1.0".into(), "15.2.9".into(), "14.3.0".into()],
                latest_version: "16.1.0".into(),
            },
            StaticFetcher::uniform(vec![
                record(
                    "decorator/Component",
                    "Component",
                    "decorator",
                    "Marks a class as an Angular component and provides configuration metadata.",
                ),
                record(
                    "decorator/Injectable",
                    "Injectable",
                    "decorator",
                    "Marks a class as available to be provided and injected as a dependency.",
                ),
                record(
                    "decorator/NgModule",
                    "NgModule",
                    "decorator",
                    "Marks a class as an NgModule and supplies configuration metadata.",
                ),
                record(
                    "decorator/Input",
                    "Input",
                    "decorator",
                    "Marks a class field as an input property.",
                ),
                record(
                    "decorator/Output",
                    "Output",
                    "decorator",
                    "Marks a class field as an output property.",
                ),
            ]),
        ),
    ]
}
