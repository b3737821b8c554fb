//! Builtin rule packs.

mod aws;
mod generic;
mod github;
mod gitlab;
mod google;
mod keys;
mod slack;
mod stripe;

pub use aws::AwsPack;
pub use generic::GenericPack;
pub use github::GithubPack;
pub use gitlab::GitlabPack;
pub use google::GooglePack;
pub use keys::PrivateKeyPack;
pub use slack::SlackPack;
pub use stripe::StripePack;

use crate::pack::RulePack;

/// Returns all builtin packs in load order.
#[must_use]
pub fn builtin_packs() -> Vec<&'static dyn RulePack> {
    vec![
        &AwsPack,
        &GithubPack,
        &GitlabPack,
        &GooglePack,
        &SlackPack,
        &StripePack,
        &PrivateKeyPack,
        // Generic heuristics last so service-specific rules load first.
        &GenericPack,
    ]
}
