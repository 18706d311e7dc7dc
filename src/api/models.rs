use crate::api::ModelsResponse;
use crate::core::chat_stream::ChatEndpoint;
use crate::core::crew::AgentError;
use crate::utils::url::construct_api_url;

/// Lists the models served by the backend; doubles as a reachability probe.
pub async fn fetch_models(endpoint: &ChatEndpoint) -> Result<ModelsResponse, AgentError> {
    let models_url = construct_api_url(&endpoint.base_url, "models");
    let mut request = endpoint
        .client
        .get(models_url)
        .header("Content-Type", "application/json");
    if let Some(api_key) = endpoint.api_key.as_deref() {
        request = request.header("Authorization", format!("Bearer {api_key}"));
    }

    let response = request
        .send()
        .await
        .map_err(|err| AgentError::Request(err.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AgentError::Api(format!(
            "API request failed with status {status}: {error_text}"
        )));
    }

    response
        .json::<ModelsResponse>()
        .await
        .map_err(|err| AgentError::Request(err.to_string()))
}
