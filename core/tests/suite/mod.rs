mod chat_pipeline;
