use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        CreateChatCompletionRequestArgs, CreateEmbeddingRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

use crate::{
    ai::{AiError, AiInitError, ChatModel, EmbeddingModel},
    config::AiSettings,
};

/// Chat and embedding adapter backed by an OpenAI-compatible API.
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    embedding_model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    system_prompt: Option<String>,
}

impl OpenAiClient {
    /// Instantiates a new client using the provided configuration.
    pub fn try_new(settings: &AiSettings) -> Result<Self, AiInitError> {
        let Some(api_key) = settings.api_key.as_deref().filter(|key| !key.trim().is_empty())
        else {
            return Err(AiInitError::InvalidConfiguration(
                "`ai.api_key` or OPENAI_API_KEY must be provided".to_string(),
            ));
        };
        if settings.model.trim().is_empty() {
            return Err(AiInitError::InvalidConfiguration(
                "`ai.model` must be provided".to_string(),
            ));
        }
        if settings.embedding_model.trim().is_empty() {
            return Err(AiInitError::InvalidConfiguration(
                "`ai.embedding_model` must be provided".to_string(),
            ));
        }

        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = &settings.api_base {
            config = config.with_api_base(base.clone());
        }
        let client = Client::with_config(config);

        Ok(Self {
            client,
            model: settings.model.clone(),
            embedding_model: settings.embedding_model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            system_prompt: settings.system_prompt.clone(),
        })
    }

    fn build_messages(&self, prompt: String) -> Result<Vec<ChatCompletionRequestMessage>, AiError> {
        let mut messages = Vec::new();
        if let Some(system_prompt) = &self.system_prompt {
            let system = ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt.clone())
                .build()
                .map_err(|err| AiError::Request(err.to_string()))?;
            messages.push(ChatCompletionRequestMessage::System(system));
        }

        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Text(prompt))
            .build()
            .map_err(|err| AiError::Request(err.to_string()))?;
        messages.push(ChatCompletionRequestMessage::User(user));
        Ok(messages)
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, prompt: String) -> Result<String, AiError> {
        let messages = self.build_messages(prompt)?;
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(self.model.clone());
        builder.messages(messages);
        if let Some(max_tokens) = self.max_tokens {
            builder.max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            builder.temperature(temperature);
        }
        let payload = builder
            .build()
            .map_err(|err| AiError::Request(err.to_string()))?;

        let response = self
            .client
            .chat()
            .create(payload)
            .await
            .map_err(|err| AiError::Provider(err.to_string()))?;

        response
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or(AiError::EmptyResponse)
    }
}

#[async_trait]
impl EmbeddingModel for OpenAiClient {
    async fn embed(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, AiError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let expected = inputs.len();
        let payload = CreateEmbeddingRequestArgs::default()
            .model(self.embedding_model.clone())
            .input(inputs)
            .build()
            .map_err(|err| AiError::Request(err.to_string()))?;

        let response = self
            .client
            .embeddings()
            .create(payload)
            .await
            .map_err(|err| AiError::Provider(err.to_string()))?;

        let mut data = response.data;
        if data.len() != expected {
            return Err(AiError::EmptyResponse);
        }
        data.sort_by_key(|embedding| embedding.index);
        tracing::debug!(count = data.len(), model = self.embedding_model.as_str(), "embeddings received");
        Ok(data.into_iter().map(|embedding| embedding.embedding).collect())
    }
}
