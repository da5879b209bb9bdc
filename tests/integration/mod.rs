mod download_pipeline;
