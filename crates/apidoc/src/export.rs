use crate::error::ApiDocResult;
use crate::specification::OpenApiSpec;
use std::fs;
use std::path::Path;

pub const INDEX_FILE: &str = "index.html";
pub const JSON_FILE: &str = "swagger.json";
pub const YAML_FILE: &str = "swagger.yaml";

/// Pretty-printed JSON rendition of the document
pub fn to_json(spec: &OpenApiSpec) -> ApiDocResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(spec)?)
}

pub fn to_yaml(spec: &OpenApiSpec) -> ApiDocResult<Vec<u8>> {
    Ok(serde_yaml::to_string(spec)?.into_bytes())
}

/// Both renditions of the document, JSON first
pub fn generate_documents(spec: &OpenApiSpec) -> ApiDocResult<(Vec<u8>, Vec<u8>)> {
    Ok((to_json(spec)?, to_yaml(spec)?))
}

/// Write the viewer page and both documents into `dir`, creating it if needed
pub fn create_swagger_files(
    dir: impl AsRef<Path>,
    index: &[u8],
    json: &[u8],
    yaml: &[u8],
) -> ApiDocResult<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    fs::write(dir.join(INDEX_FILE), index)?;
    fs::write(dir.join(JSON_FILE), json)?;
    fs::write(dir.join(YAML_FILE), yaml)?;

    tracing::info!(path = %dir.display(), "wrote API documentation files");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::{ExternalDocumentation, Info, Server, Tag};

    fn sample_spec() -> OpenApiSpec {
        let mut spec = OpenApiSpec::new(Info {
            title: "Title".to_string(),
            description: Some("This is the description".to_string()),
            version: "v1.0".to_string(),
            ..Default::default()
        });
        spec.servers.push(Server {
            url: "http://example.com".to_string(),
            description: None,
            variables: None,
        });
        spec.servers.push(Server {
            url: "http://localhost:8080".to_string(),
            description: Some("Development server".to_string()),
            variables: None,
        });
        let mut tag = Tag::new("Test Tag");
        tag.external_docs = Some(ExternalDocumentation {
            url: "http://example.com".to_string(),
            description: Some("Find out more".to_string()),
        });
        spec.tags.push(tag);
        spec
    }

    #[test]
    fn test_generate_documents() {
        let (json, yaml) = generate_documents(&sample_spec()).unwrap();
        let json = String::from_utf8(json).unwrap();
        let yaml = String::from_utf8(yaml).unwrap();

        for document in [&json, &yaml] {
            assert!(document.contains("Title"));
            assert!(document.contains("Test Tag"));
            assert!(document.contains("http://localhost:8080"));
            assert!(document.contains("http://example.com"));
        }

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["openapi"], "3.0.3");
        assert!(parsed.get("components").is_none());
    }

    #[test]
    fn test_create_swagger_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("docs");

        create_swagger_files(&target, b"index", b"json", b"yaml").unwrap();

        assert_eq!(fs::read(target.join(INDEX_FILE)).unwrap(), b"index");
        assert_eq!(fs::read(target.join(JSON_FILE)).unwrap(), b"json");
        assert_eq!(fs::read(target.join(YAML_FILE)).unwrap(), b"yaml");
    }

    #[test]
    fn test_create_swagger_files_fails_on_file_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = create_swagger_files(file.path(), b"index", b"json", b"yaml");
        assert!(matches!(result, Err(crate::ApiDocError::Io(_))));
    }
}
