use super::{AgentError, ToolContext, ToolDescriptor, ToolRuntime};

impl ToolRuntime {
    /// Fetches the server's tool catalogue and guidance.
    pub async fn build_context(&self) -> Result<ToolContext, AgentError> {
        let tools = self.gateway.list_tools().await?;
        let server_instructions = self
            .gateway
            .instructions()
            .await
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(ToolContext {
            tools: tools
                .into_iter()
                .map(|info| ToolDescriptor {
                    name: info.name,
                    description: info.description,
                    input_schema: info.input_schema,
                })
                .collect(),
            server_instructions,
        })
    }
}
