use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};

use crate::case;
use crate::model::CaseNaming;

/// Registers the case helpers on a registry.
pub fn register_case_helpers(registry: &mut Handlebars<'_>, naming: CaseNaming) {
    registry.register_helper("kebabCase", Box::new(kebab_case_helper));
    registry.register_helper("snakeCase", Box::new(snake_case_helper));
    registry.register_helper("pascalCase", Box::new(pascal_case_helper));
    registry.register_helper("camelCase", Box::new(camel_case_helper));
    match naming {
        CaseNaming::Standard => {
            registry.register_helper("upperKebabCase", Box::new(upper_kebab_case_helper));
            registry.register_helper("upperSnakeCase", Box::new(upper_snake_case_helper));
        }
        CaseNaming::Legacy => {
            registry.register_helper("upperKebabCase", Box::new(upper_snake_case_helper));
            registry.register_helper("upperSnakeCase", Box::new(upper_kebab_case_helper));
        }
    }
}

/// Writes the converted first parameter, which must be a string.
fn write_converted(
    helper: &'static str,
    h: &Helper,
    out: &mut dyn Output,
    convert: fn(&str) -> String,
) -> HelperResult {
    let param = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex(helper, 0))?;
    let value = param
        .value()
        .as_str()
        .ok_or(RenderErrorReason::InvalidParamType("string"))?;
    out.write(&convert(value))?;
    Ok(())
}

fn kebab_case_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_converted("kebabCase", h, out, case::kebab_case)
}

fn snake_case_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_converted("snakeCase", h, out, case::snake_case)
}

fn upper_kebab_case_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_converted("upperKebabCase", h, out, case::upper_kebab_case)
}

fn upper_snake_case_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_converted("upperSnakeCase", h, out, case::upper_snake_case)
}

fn pascal_case_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_converted("pascalCase", h, out, case::pascal_case)
}

fn camel_case_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_converted("camelCase", h, out, case::camel_case)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(naming: CaseNaming, template: &str) -> String {
        let mut registry = Handlebars::new();
        register_case_helpers(&mut registry, naming);
        registry
            .render_template(template, &json!({ "name": "orderLine" }))
            .expect("render")
    }

    #[test]
    fn helpers_convert_the_first_parameter() {
        assert_eq!(
            render(CaseNaming::Standard, "{{kebabCase name}} {{snakeCase name}} {{pascalCase name}}"),
            "order-line order_line OrderLine"
        );
        assert_eq!(render(CaseNaming::Standard, "{{camelCase \"Order Line\"}}"), "orderLine");
    }

    #[test]
    fn non_string_or_missing_parameters_fail() {
        let mut registry = Handlebars::new();
        register_case_helpers(&mut registry, CaseNaming::Standard);
        let data = json!({ "name": "orderLine", "count": 42 });

        for template in ["{{snakeCase 42}}", "{{pascalCase count}}", "{{kebabCase missing}}", "{{camelCase}}"] {
            assert!(
                registry.render_template(template, &data).is_err(),
                "{template} should not render"
            );
        }
    }

    #[test]
    fn legacy_naming_swaps_the_upper_helpers() {
        let template = "{{upperKebabCase name}} {{upperSnakeCase name}}";
        assert_eq!(render(CaseNaming::Standard, template), "ORDER-LINE ORDER_LINE");
        assert_eq!(render(CaseNaming::Legacy, template), "ORDER_LINE ORDER-LINE");
    }
}
