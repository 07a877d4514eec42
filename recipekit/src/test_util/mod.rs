use serde_json::{json, Value};

pub const DOCS_BASE_URL: &str = "https://platform.openai.com";

/// A trimmed down OpenAI document. The request schema is declared before the schemas it
/// references, and the operations cover a referenced body, no body, a path without an
/// `operationId`, and an inline body.
pub fn chat_completions_document() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "OpenAI API",
            "version": "2.0.0"
        },
        "servers": [{ "url": "https://api.openai.com/v1" }],
        "paths": {
            "/chat/completions": {
                "post": {
                    "operationId": "createChatCompletion",
                    "summary": "Creates a model response for the given chat conversation.",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateChatCompletionRequest" }
                            }
                        }
                    }
                }
            },
            "/models": {
                "get": {
                    "operationId": "listModels",
                    "summary": "Lists the currently available models."
                }
            },
            "/models/{model}": {
                "parameters": [{ "name": "model", "in": "path", "required": true }],
                "delete": {
                    "summary": "Delete a fine-tuned model."
                }
            },
            "/embeddings": {
                "post": {
                    "operationId": "createEmbedding",
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "required": ["model", "input"],
                                    "properties": {
                                        "model": { "type": "string" },
                                        "input": {
                                            "oneOf": [
                                                { "type": "string" },
                                                { "type": "array", "items": { "type": "string" } }
                                            ]
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "CreateChatCompletionRequest": {
                    "type": "object",
                    "required": ["model", "messages"],
                    "properties": {
                        "model": {
                            "type": "string",
                            "description": "ID of the model to use. See the [model endpoint compatibility](/docs/models/model-endpoint-compatibility) table."
                        },
                        "messages": {
                            "type": "array",
                            "minItems": 1,
                            "items": { "$ref": "#/components/schemas/ChatCompletionRequestMessage" }
                        },
                        "temperature": {
                            "type": "number",
                            "minimum": 0,
                            "maximum": 2,
                            "default": 1,
                            "example": 1,
                            "nullable": true
                        }
                    }
                },
                "ChatCompletionRequestMessage": {
                    "type": "object",
                    "required": ["role"],
                    "properties": {
                        "role": { "$ref": "#/components/schemas/ChatCompletionRole" },
                        "content": { "type": "string", "nullable": true }
                    }
                },
                "ChatCompletionRole": {
                    "type": "string",
                    "enum": ["system", "user", "assistant"]
                }
            }
        }
    })
}
