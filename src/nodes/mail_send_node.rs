//! Mail-send node: resolves subject and body, sends once, never aborts the run.

use tracing::{info, warn};

use crate::adapters::MailRequest;
use crate::context::ExecutionContext;
use crate::host::NoticeKind;
use crate::template;
use crate::types::{FlowNode, MailSendConfig, NodeOutcome, VariableStore};

pub(crate) fn build_request(config: &MailSendConfig, store: &VariableStore) -> MailRequest {
  MailRequest {
    server: config.smtp_server.trim().to_string(),
    port: config.smtp_port,
    user: config.user.clone(),
    password: config.password.clone(),
    from: config.from.trim().to_string(),
    recipients: config.recipients(),
    subject: template::resolve(&config.subject, store),
    body: template::resolve(&config.body, store),
    is_html: config.is_html,
  }
}

pub(crate) async fn execute(
  node: &FlowNode,
  config: &MailSendConfig,
  ctx: &ExecutionContext,
) -> NodeOutcome {
  let request = build_request(config, &ctx.variables);
  match ctx.services.mail.send(&request).await {
    Ok(()) => {
      info!(node_id = %node.id, recipients = request.recipients.len(), "mail sent");
      ctx
        .services
        .notifier
        .notify(NoticeKind::Info, &format!("Mail sent to {}", request.recipients.join(", ")));
    }
    Err(e) => {
      warn!(node_id = %node.id, error = %e, "mail delivery failed");
      ctx
        .services
        .notifier
        .notify(NoticeKind::Error, &format!("Error sending mail: {}", e));
    }
  }
  NodeOutcome::next(node.next())
}
