use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{ApiConfig, Environment};

pub fn cors_layer(config: &ApiConfig, environment: Environment) -> CorsLayer {
	let cors = CorsLayer::new()
		.allow_methods([Method::POST, Method::GET, Method::OPTIONS])
		.allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

	match environment {
		Environment::Production => {
			let origins = config
				.allowed_origins
				.iter()
				.filter_map(|origin| match HeaderValue::from_str(origin) {
					Ok(origin) => Some(origin),
					Err(_) => {
						tracing::warn!(origin = %origin, "ignoring invalid allowed origin");
						None
					}
				})
				.collect::<Vec<_>>();

			cors.allow_origin(AllowOrigin::list(origins))
		}
		Environment::Development => cors.allow_origin(Any),
	}
}
