/// AWS service clients used by the service, grouped so the rest of the code
/// can treat "AWS is configured" as a single yes/no.
#[derive(Debug, Clone)]
pub struct AwsClients {
    /// Queue transport for the background processors and the events endpoint.
    pub sqs: aws_sdk_sqs::Client,

    /// Topic publisher for the notify endpoint.
    pub sns: aws_sdk_sns::Client,
}

/// Loads AWS clients from the ambient environment configuration.
///
/// Configuration comes from the usual environment variables such as:
/// - `AWS_ACCESS_KEY_ID`
/// - `AWS_SECRET_ACCESS_KEY`
/// - `AWS_REGION`
/// - `AWS_PROFILE`
///
/// Returns `None` when no region resolves, in which case the service runs
/// HTTP-only: no message processors, and the notify/events endpoints report
/// their clients as unconfigured.
///
/// # Example
///
/// ```rust,no_run
/// use products_api::client::load_aws_clients_from_env;
///
/// #[tokio::main]
/// async fn main() {
///     if let Some(clients) = load_aws_clients_from_env().await {
///         let _ = clients.sqs.list_queues().send().await;
///     }
/// }
/// ```
pub async fn load_aws_clients_from_env() -> Option<AwsClients> {
    let config = aws_config::load_from_env().await;
    config.region()?;

    Some(AwsClients {
        sqs: aws_sdk_sqs::Client::new(&config),
        sns: aws_sdk_sns::Client::new(&config),
    })
}

/// Creates an AWS SQS client using credentials and configuration from the
/// environment.
///
/// # Returns
///
/// Returns a configured `aws_sdk_sqs::Client` ready for use.
pub async fn create_sqs_client_from_env() -> aws_sdk_sqs::Client {
    let config = aws_config::load_from_env().await;
    aws_sdk_sqs::Client::new(&config)
}
