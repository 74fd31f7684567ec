/*!
Swagger UI viewer page.

The page loads the Swagger UI bundle from a CDN and hands it the
[`SwaggerUiConfig`] serialized as JSON, so every UI setting reaches
`SwaggerUIBundle` unchanged.
*/

use crate::config::SwaggerUiConfig;
use crate::error::ApiDocResult;

const SWAGGER_UI_DIST: &str = "https://unpkg.com/swagger-ui-dist@5.9.0";

/// Render the viewer page for `config`
pub fn generate_index_page(config: &SwaggerUiConfig) -> ApiDocResult<String> {
    let mut settings = serde_json::to_value(config)?;
    if let Some(settings) = settings.as_object_mut() {
        settings.remove("title");
    }
    // Keep a `</script>` inside a string value from closing the script block
    let settings = serde_json::to_string(&settings)?.replace("</", "<\\/");
    let title = html_escape::encode_text(&config.title);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="{dist}/swagger-ui.css" />
    <style>
        html {{
            box-sizing: border-box;
            overflow: -moz-scrollbars-vertical;
            overflow-y: scroll;
        }}

        *, *:before, *:after {{
            box-sizing: inherit;
        }}

        body {{
            margin:0;
            background: #fafafa;
        }}
    </style>
</head>
<body>
    <div id="swagger-ui"></div>

    <script src="{dist}/swagger-ui-bundle.js"></script>
    <script src="{dist}/swagger-ui-standalone-preset.js"></script>
    <script>
        const config = {settings};

        window.onload = function() {{
            const ui = SwaggerUIBundle(Object.assign({{}}, config, {{
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                plugins: [
                    SwaggerUIBundle.plugins.DownloadUrl
                ],
                layout: "StandaloneLayout"
            }}));

            window.ui = ui;
        }};
    </script>
</body>
</html>"#,
        title = title,
        dist = SWAGGER_UI_DIST,
        settings = settings,
    ))
}
