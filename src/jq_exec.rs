//! jq pre-filtering of input documents (via jaq).
use anyhow::{anyhow, Context, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` over `input`; every output becomes one document.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in outputs {
        let val = item.map_err(|e| anyhow!("jq `{filter_src}` failed: {e:?}"))?;
        // Val renders as JSON text; reparse to get back to serde_json
        let text = val.to_string();
        let value = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("jq `{filter_src}` produced non-JSON output"))?;
        out.push(value);
    }
    Ok(out)
}

fn format_parse_errors(
    errs: Vec<(load::File<&str, ()>, load::Error<&str>)>,
) -> anyhow::Error {
    let lines = errs
        .into_iter()
        .map(|(file, err)| format!("parse error: {err:?} in `{}`", file.code))
        .collect::<Vec<_>>();
    anyhow!(lines.join("\n"))
}

fn format_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let lines = errs
        .into_iter()
        .flat_map(|(file, list)| {
            list.into_iter()
                .map(move |(name, undef)| format!("undefined `{name}`: {undef:?} in `{}`", file.code))
        })
        .collect::<Vec<_>>();
    anyhow!(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn each_output_is_a_document() {
        let input = json!({ "people": [{ "name": "a" }, { "name": "b" }] });
        let out = run_jaq(".people[]", &input).unwrap();
        assert_eq!(out, vec![json!({ "name": "a" }), json!({ "name": "b" })]);
    }

    #[test]
    fn undefined_function_is_an_error() {
        assert!(run_jaq("nope(1)", &json!(null)).is_err());
    }
}
