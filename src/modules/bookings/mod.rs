pub mod models;
pub mod routes;
pub mod store;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use clinic_kernel::{settings::BookingSettings, InitCtx, Migration, Module};

use routes::BookingsState;
use store::BookingStore;

/// Appointment bookings: CRUD over the `bookings` table
pub struct BookingsModule {
    state: BookingsState,
}

impl BookingsModule {
    pub fn new(store: Arc<dyn BookingStore>, settings: &BookingSettings) -> Self {
        Self {
            state: BookingsState {
                store,
                strict_validation: settings.strict_validation,
            },
        }
    }
}

#[async_trait]
impl Module for BookingsModule {
    fn name(&self) -> &'static str {
        "bookings"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            strict_validation = self.state.strict_validation,
            "bookings module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_bookings",
            up: r#"
                CREATE TABLE IF NOT EXISTS bookings (
                    id          BIGINT       NOT NULL AUTO_INCREMENT PRIMARY KEY,
                    service     VARCHAR(255) NOT NULL,
                    doctor_name VARCHAR(255) NOT NULL,
                    start_time  VARCHAR(16)  NOT NULL,
                    end_time    VARCHAR(16)  NOT NULL,
                    date        DATE         NOT NULL
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "bookings module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "bookings module stopped");
        Ok(())
    }
}

/// Create the bookings module over `store`
pub fn create_module(store: Arc<dyn BookingStore>, settings: &BookingSettings) -> Arc<dyn Module> {
    Arc::new(BookingsModule::new(store, settings))
}

fn error_response(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn text_response(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": { "text/plain": { "schema": { "type": "string" } } }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let id_parameter = serde_json::json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    });
    let payload_body = serde_json::json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookingPayload" }
            }
        }
    });

    serde_json::json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List bookings",
                    "tags": ["Bookings"],
                    "responses": {
                        "200": {
                            "description": "Every booking",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Booking" }
                                    }
                                }
                            }
                        },
                        "500": error_response("Internal server error")
                    }
                },
                "post": {
                    "summary": "Create a booking",
                    "tags": ["Bookings"],
                    "requestBody": payload_body,
                    "responses": {
                        "201": text_response("Booking inserted"),
                        "422": error_response("Malformed body or rejected schedule"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Fetch one booking",
                    "tags": ["Bookings"],
                    "parameters": [id_parameter],
                    "responses": {
                        "200": {
                            "description": "The booking",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Booking" }
                                }
                            }
                        },
                        "404": error_response("Booking not found"),
                        "500": error_response("Internal server error")
                    }
                },
                "put": {
                    "summary": "Replace a booking",
                    "tags": ["Bookings"],
                    "parameters": [id_parameter],
                    "requestBody": payload_body,
                    "responses": {
                        "200": text_response("Booking updated"),
                        "404": error_response("Booking not found"),
                        "500": error_response("Internal server error")
                    }
                },
                "delete": {
                    "summary": "Delete a booking",
                    "tags": ["Bookings"],
                    "parameters": [id_parameter],
                    "responses": {
                        "200": text_response("Booking deleted"),
                        "404": error_response("Booking not found"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Bookings health check",
                    "tags": ["Bookings"],
                    "responses": { "200": text_response("OK") }
                }
            }
        },
        "components": {
            "schemas": {
                "Booking": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "service": { "type": "string" },
                        "doctor_name": { "type": "string" },
                        "start_time": { "type": "string", "example": "09:00" },
                        "end_time": { "type": "string", "example": "09:30" },
                        "date": { "type": "string", "format": "date" }
                    },
                    "required": ["id", "service", "doctor_name", "start_time", "end_time", "date"]
                },
                "BookingPayload": {
                    "type": "object",
                    "properties": {
                        "service": {
                            "type": "string",
                            "enum": ["Consultation", "Checkup", "Surgery", "Therapy"]
                        },
                        "doctor": {
                            "type": "string",
                            "enum": ["Dr. John Doe", "Dr. Jane Smith", "Dr. Albert Brown", "Dr. Nancy White"]
                        },
                        "startTime": { "type": "string", "example": "09:00" },
                        "endTime": { "type": "string", "example": "09:30" },
                        "date": { "type": "string", "format": "date" }
                    },
                    "required": ["service", "doctor", "startTime", "endTime", "date"]
                }
            }
        }
    })
}
