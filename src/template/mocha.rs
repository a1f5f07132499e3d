//! Mocha renderer (CommonJS requires, chai `expect`, `it`)

use super::{BodyStyle, RenderContext};

const STYLE: BodyStyle = BodyStyle {
    test_fn: "it",
    reset: "// Reset shared state",
    defined,
};

fn defined(name: &str) -> String {
    format!("expect({}).to.not.be.undefined;", name)
}

pub(crate) fn render(ctx: &RenderContext<'_>) -> String {
    let mut out = ctx.header();
    out.push_str("const { expect } = require('chai');\n");
    out.push_str(&ctx.dependency_notes());

    match ctx.named_imports() {
        Some(names) => out.push_str(&format!(
            "const {{ {} }} = require('./{}');\n",
            names, ctx.base_name
        )),
        None => out.push_str(&format!(
            "const {} = require('./{}');\n",
            ctx.base_name, ctx.base_name
        )),
    }
    if ctx.analysis.is_react_component {
        out.push_str("const { render, screen } = require('@testing-library/react');\n");
    }
    out.push_str(ctx.database_note());
    out.push('\n');

    out.push_str(&ctx.body(&STYLE));
    out
}
