// ─── Argument Templates ───
// Two metadata schemas describe launch arguments. They never mix: a release
// uses either the templated lists or the legacy flat string.

use crate::core::rules::{self, HostDescriptor};
use crate::core::version::{ArgumentElement, VersionJson};

use super::variables::LaunchVariables;

/// Pre-entry-point arguments of the legacy schema.
const LEGACY_JVM_ARGS: &[&str] = &[
    "-Djava.library.path=${natives_directory}",
    "-cp",
    "${classpath}",
];

#[derive(Debug, Clone, Copy)]
pub enum ArgumentSchema<'a> {
    /// `arguments.jvm` / `arguments.game` lists with conditional elements.
    Templated {
        jvm: &'a [ArgumentElement],
        game: &'a [ArgumentElement],
    },
    /// `minecraftArguments`: a single space-separated string.
    Legacy { flat: &'a str },
}

impl<'a> ArgumentSchema<'a> {
    pub fn of(metadata: &'a VersionJson) -> Self {
        match (&metadata.arguments, &metadata.minecraft_arguments) {
            (Some(arguments), _) => ArgumentSchema::Templated {
                jvm: &arguments.jvm,
                game: &arguments.game,
            },
            (None, Some(flat)) => ArgumentSchema::Legacy {
                flat: flat.as_str(),
            },
            (None, None) => ArgumentSchema::Legacy { flat: "" },
        }
    }
}

/// Arguments before and after the entry-point class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedArguments {
    pub jvm: Vec<String>,
    pub game: Vec<String>,
}

pub fn expand(
    schema: ArgumentSchema<'_>,
    vars: &LaunchVariables,
    host: &HostDescriptor,
) -> ExpandedArguments {
    match schema {
        ArgumentSchema::Templated { jvm, game } => ExpandedArguments {
            jvm: expand_templated(jvm, vars, host),
            game: expand_templated(game, vars, host),
        },
        ArgumentSchema::Legacy { flat } => ExpandedArguments {
            jvm: LEGACY_JVM_ARGS.iter().map(|a| vars.substitute(a)).collect(),
            game: flat
                .split(' ')
                .filter(|token| !token.is_empty())
                .map(|token| vars.substitute(token))
                .collect(),
        },
    }
}

fn expand_templated(
    elements: &[ArgumentElement],
    vars: &LaunchVariables,
    host: &HostDescriptor,
) -> Vec<String> {
    let mut out = Vec::new();
    for element in elements {
        match element {
            ArgumentElement::Plain(arg) => out.push(vars.substitute(arg)),
            ArgumentElement::Conditional {
                rules: conditions,
                value,
            } => {
                if rules::applies(conditions.as_deref(), host) {
                    out.extend(value.values().iter().map(|v| vars.substitute(v)));
                }
            }
        }
    }
    out
}
