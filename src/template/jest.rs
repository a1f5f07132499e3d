//! Jest renderer (ES module imports, `test`, `jest.clearAllMocks`)

use super::{BodyStyle, RenderContext};

const STYLE: BodyStyle = BodyStyle {
    test_fn: "test",
    reset: "jest.clearAllMocks();",
    defined,
};

fn defined(name: &str) -> String {
    format!("expect({}).toBeDefined();", name)
}

pub(crate) fn render(ctx: &RenderContext<'_>) -> String {
    let mut out = ctx.header();
    out.push_str(&ctx.dependency_notes());
    out.push('\n');

    match ctx.named_imports() {
        Some(names) => out.push_str(&format!(
            "import {{ {} }} from './{}';\n",
            names, ctx.base_name
        )),
        None => out.push_str(&format!(
            "import {} from './{}';\n",
            ctx.base_name, ctx.base_name
        )),
    }
    if ctx.analysis.is_react_component {
        out.push_str("import { render, screen } from '@testing-library/react';\n");
    }
    out.push_str(ctx.database_note());
    out.push('\n');

    out.push_str(&ctx.body(&STYLE));
    out
}
