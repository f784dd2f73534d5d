use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "company": {
                "type": "object",
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "logo": { "type": "string" }
                }
            },
            "input": {
                "type": "object",
                "properties": {
                    "data_file": { "type": "string" }
                }
            },
            "output": {
                "type": "object",
                "properties": {
                    "directory": { "type": "string" },
                    "html_file": { "type": "string", "pattern": "\\.html?$" }
                }
            },
            "audit_date": { "type": "string" },
            "llm": {
                "type": "object",
                "properties": {
                    "provider": { "type": "string", "enum": ["gemini", "openai", "anthropic", "local"] },
                    "model": { "type": "string" },
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string", "format": "uri" },
                    "enabled": { "type": "boolean" }
                }
            },
            "prompts": {
                "type": "object",
                "properties": {
                    "directory": { "type": "string" }
                }
            }
        }
    })
});
