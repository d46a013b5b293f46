//! jq pre-selection of input documents before validation.
use anyhow::{anyhow, Context, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` over `input` and collect every emitted document.
/// A filter may emit zero, one or many documents per input.
pub fn select_documents(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(describe_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(describe_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut documents = Vec::new();
    for output in outputs {
        let output = output.map_err(|e| anyhow!("jq filter `{filter_src}` failed: {e:?}"))?;
        // Val prints as JSON text
        let text = output.to_string();
        let document = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("jq filter `{filter_src}` emitted non-JSON output: {text}"))?;
        documents.push(document);
    }
    Ok(documents)
}

fn describe_parse_errors(
    errs: Vec<(load::File<&str, ()>, load::Error<&str>)>,
) -> anyhow::Error {
    let lines: Vec<String> = errs
        .into_iter()
        .map(|(file, err)| format!("jq parse error: {err:?} in `{}`", file.code))
        .collect();
    anyhow!(lines.join("\n"))
}

fn describe_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let lines: Vec<String> = errs
        .into_iter()
        .flat_map(|(file, list)| {
            list.into_iter()
                .map(move |(name, undef)| format!("jq undefined `{name}`: {undef:?} in `{}`", file.code))
        })
        .collect();
    anyhow!(lines.join("\n"))
}
