//! Quarterdeck MCP Server - Exposes the governance tools via Model Context Protocol.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_async)]
#![allow(clippy::uninlined_format_args)]

use std::io::{BufRead, BufReader, Write};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use quarterdeck::config::DocumentsConfig;
use quarterdeck::entities::TaskDraft;
use quarterdeck::errors::QuarterdeckError;
use quarterdeck::tools::{ToolOutcome, Toolbox};

/// JSON-RPC request structure
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC response structure
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

/// MCP server state
struct McpServer {
    toolbox: Toolbox,
}

impl McpServer {
    async fn handle_request(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone().unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => Self::handle_initialize(id),
            "tools/list" => Self::handle_tools_list(id),
            "tools/call" => self.handle_tool_call(id, request.params.as_ref()).await,
            _ => JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32601,
                    message: "Method not found".to_string(),
                }),
            },
        }
    }

    fn handle_initialize(id: Value) -> JsonRpcResponse {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "quarterdeck-mcp",
                    "version": env!("CARGO_PKG_VERSION")
                }
            })),
            error: None,
        }
    }

    fn handle_tools_list(id: Value) -> JsonRpcResponse {
        let tools = json!({
            "tools": [
                {
                    "name": "read_task_list",
                    "description": "Read the task list for a user",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "user_name": {
                                "type": "string",
                                "description": "The user whose list to read"
                            }
                        },
                        "required": ["user_name"]
                    }
                },
                {
                    "name": "write_task",
                    "description": "Add a new task to a user's list",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "user_name": {
                                "type": "string",
                                "description": "The user whose list to modify"
                            },
                            "title": {
                                "type": "string",
                                "description": "Task title"
                            },
                            "assignee": {
                                "type": "string",
                                "description": "Who the task is assigned to"
                            },
                            "deadline": {
                                "type": "string",
                                "description": "Deadline for the task (YYYY-MM-DD)"
                            },
                            "description": {
                                "type": "string",
                                "description": "Task description"
                            }
                        },
                        "required": ["user_name", "title", "assignee", "deadline", "description"]
                    }
                },
                {
                    "name": "edit_task",
                    "description": "Modify or delete an existing task",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "user_name": {
                                "type": "string",
                                "description": "The user whose list to modify"
                            },
                            "task_id": {
                                "type": "integer",
                                "description": "The ID of the task to modify or delete"
                            },
                            "action": {
                                "type": "string",
                                "description": "The action to perform: 'modify' or 'delete'"
                            },
                            "updates": {
                                "type": "object",
                                "description": "Fields to modify (title, assignee, deadline, description, status). Required for 'modify'."
                            }
                        },
                        "required": ["user_name", "task_id", "action"]
                    }
                },
                {
                    "name": "read_charter",
                    "description": "Read the full crew charter document",
                    "inputSchema": {
                        "type": "object",
                        "properties": {}
                    }
                },
                {
                    "name": "write_charter_article",
                    "description": "Append a new article to the crew charter",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "title": {
                                "type": "string",
                                "description": "Title for the new article (e.g. 'Article VI: Keep the Ship Tidy')"
                            },
                            "text": {
                                "type": "string",
                                "description": "Text content of the new article"
                            }
                        },
                        "required": ["title", "text"]
                    }
                },
                {
                    "name": "edit_charter_article",
                    "description": "Modify or delete an existing charter article by exact title",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "target_title": {
                                "type": "string",
                                "description": "Exact title of the article to edit or delete"
                            },
                            "action": {
                                "type": "string",
                                "description": "The action to perform: 'modify' or 'delete'"
                            },
                            "new_body": {
                                "type": "string",
                                "description": "New text content. Required for 'modify', ignored for 'delete'."
                            }
                        },
                        "required": ["target_title", "action"]
                    }
                },
                {
                    "name": "read_meeting_log",
                    "description": "Read the meeting log for a specific date",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "date": {
                                "type": "string",
                                "description": "Meeting date (YYYY-MM-DD)"
                            }
                        },
                        "required": ["date"]
                    }
                },
                {
                    "name": "write_meeting_log",
                    "description": "Create or overwrite the meeting log for a specific date",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "date": {
                                "type": "string",
                                "description": "Meeting date (YYYY-MM-DD)"
                            },
                            "participants": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "Participant names"
                            },
                            "content": {
                                "type": "string",
                                "description": "Meeting notes (markdown recommended)"
                            }
                        },
                        "required": ["date", "participants", "content"]
                    }
                },
                {
                    "name": "read_team_profile",
                    "description": "Read a crew member's profile",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "member_name": {
                                "type": "string",
                                "description": "The crew member's name"
                            }
                        },
                        "required": ["member_name"]
                    }
                },
                {
                    "name": "read_partner_doc",
                    "description": "Read a partnership document",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "document_type": {
                                "type": "string",
                                "description": "Which document to read: 'agreement' or 'companion'"
                            }
                        },
                        "required": ["document_type"]
                    }
                },
                {
                    "name": "route_request",
                    "description": "Classify a request into a governance context and report its delegation sequence",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "request": {
                                "type": "string",
                                "description": "The user request to classify"
                            }
                        },
                        "required": ["request"]
                    }
                }
            ]
        });

        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(tools),
            error: None,
        }
    }

    async fn handle_tool_call(&self, id: Value, params: Option<&Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32602,
                    message: "Missing params".to_string(),
                }),
            };
        };

        let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let outcome = self.dispatch(tool_name, &arguments).await;
        let is_error = !outcome.is_success();
        let text = serde_json::to_string_pretty(&outcome)
            .unwrap_or_else(|_| r#"{"status":"error","error_message":"unserializable outcome"}"#.to_string());

        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(json!({
                "content": [{
                    "type": "text",
                    "text": text
                }],
                "isError": is_error
            })),
            error: None,
        }
    }

    async fn dispatch(&self, tool_name: &str, args: &Value) -> ToolOutcome {
        match tool_name {
            "read_task_list" => match required_str(args, "user_name") {
                Ok(user_name) => self.toolbox.read_task_list(user_name).await,
                Err(e) => e.into(),
            },
            "write_task" => {
                let parsed = (|| {
                    Ok::<_, QuarterdeckError>((
                        required_str(args, "user_name")?.to_string(),
                        TaskDraft {
                            title: required_str(args, "title")?.to_string(),
                            assignee: required_str(args, "assignee")?.to_string(),
                            deadline: required_str(args, "deadline")?.to_string(),
                            description: required_str(args, "description")?.to_string(),
                        },
                    ))
                })();
                match parsed {
                    Ok((user_name, draft)) => self.toolbox.write_task(&user_name, draft).await,
                    Err(e) => e.into(),
                }
            }
            "edit_task" => {
                let parsed = (|| {
                    Ok::<_, QuarterdeckError>((
                        required_str(args, "user_name")?.to_string(),
                        required_task_id(args)?,
                        required_str(args, "action")?.to_string(),
                    ))
                })();
                match parsed {
                    Ok((user_name, task_id, action)) => {
                        self.toolbox
                            .edit_task(&user_name, task_id, &action, args.get("updates"))
                            .await
                    }
                    Err(e) => e.into(),
                }
            }
            "read_charter" => self.toolbox.read_charter().await,
            "write_charter_article" => {
                match (required_str(args, "title"), required_str(args, "text")) {
                    (Ok(title), Ok(text)) => self.toolbox.write_charter_article(title, text).await,
                    (Err(e), _) | (_, Err(e)) => e.into(),
                }
            }
            "edit_charter_article" => {
                match (
                    required_str(args, "target_title"),
                    required_str(args, "action"),
                ) {
                    (Ok(target_title), Ok(action)) => {
                        let new_body = args.get("new_body").and_then(|v| v.as_str());
                        self.toolbox
                            .edit_charter_article(target_title, action, new_body)
                            .await
                    }
                    (Err(e), _) | (_, Err(e)) => e.into(),
                }
            }
            "read_meeting_log" => match required_str(args, "date") {
                Ok(date) => self.toolbox.read_meeting_log(date).await,
                Err(e) => e.into(),
            },
            "write_meeting_log" => {
                let parsed = (|| {
                    let date = required_str(args, "date")?.to_string();
                    let participants = args
                        .get("participants")
                        .and_then(|v| v.as_array())
                        .ok_or_else(|| missing_param("participants"))?
                        .iter()
                        .filter_map(|v| v.as_str().map(String::from))
                        .collect::<Vec<_>>();
                    let content = required_str(args, "content")?.to_string();
                    Ok::<_, QuarterdeckError>((date, participants, content))
                })();
                match parsed {
                    Ok((date, participants, content)) => {
                        self.toolbox
                            .write_meeting_log(&date, &participants, &content)
                            .await
                    }
                    Err(e) => e.into(),
                }
            }
            "read_team_profile" => match required_str(args, "member_name") {
                Ok(member_name) => self.toolbox.read_team_profile(member_name).await,
                Err(e) => e.into(),
            },
            "read_partner_doc" => match required_str(args, "document_type") {
                Ok(document_type) => self.toolbox.read_partner_doc(document_type).await,
                Err(e) => e.into(),
            },
            "route_request" => match required_str(args, "request") {
                Ok(request) => self.toolbox.route_request(request),
                Err(e) => e.into(),
            },
            _ => QuarterdeckError::validation(format!("unknown tool: {tool_name}")).into(),
        }
    }
}

fn missing_param(name: &str) -> QuarterdeckError {
    QuarterdeckError::validation(format!("missing '{name}' parameter"))
}

fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str, QuarterdeckError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| missing_param(name))
}

fn required_task_id(args: &Value) -> Result<u32, QuarterdeckError> {
    args.get("task_id")
        .and_then(serde_json::Value::as_u64)
        .and_then(|id| u32::try_from(id).ok())
        .ok_or_else(|| {
            QuarterdeckError::validation("'task_id' must be a positive integer")
        })
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = DocumentsConfig::from_env();
    let toolbox = match Toolbox::initialize(config).await {
        Ok(toolbox) => toolbox,
        Err(e) => {
            eprintln!("failed to initialize documents workspace: {e}");
            std::process::exit(1);
        }
    };

    let server = McpServer { toolbox };

    // Read from stdin, write to stdout (JSON-RPC over stdio)
    let stdin = std::io::stdin();
    let reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout();

    for line in reader.lines() {
        let Ok(line) = line else { break };

        if line.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let error_response = JsonRpcResponse {
                    jsonrpc: "2.0".to_string(),
                    id: Value::Null,
                    result: None,
                    error: Some(JsonRpcError {
                        code: -32700,
                        message: format!("Parse error: {e}"),
                    }),
                };
                if let Ok(serialized) = serde_json::to_string(&error_response) {
                    let _ = writeln!(stdout, "{serialized}");
                    let _ = stdout.flush();
                }
                continue;
            }
        };

        let response = server.handle_request(&request).await;
        if let Ok(serialized) = serde_json::to_string(&response) {
            let _ = writeln!(stdout, "{serialized}");
            let _ = stdout.flush();
        }
    }
}
