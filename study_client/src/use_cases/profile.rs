use crate::domain::GatewayError;
use crate::domain::forms::{PasswordForm, ProfileForm};
use crate::domain::models::UserProfile;
use crate::use_cases::endpoints::{ChangePassword, GetProfile, UpdateProfile};
use crate::use_cases::fetch::fetch;
use crate::use_cases::gateway::SessionGateway;

const PASSWORD_CHANGED_MESSAGE: &str = "password changed successfully";

#[tracing::instrument(name = "load_profile", skip_all)]
pub async fn load_profile(gateway: &SessionGateway) -> Result<UserProfile, GatewayError> {
    let profile = fetch(gateway, &GetProfile).await?;
    cache_profile(gateway, &profile).await;
    Ok(profile)
}

// Sends the edited fields and merges what the API echoes back over `previous`.
#[tracing::instrument(name = "update_profile", skip_all)]
pub async fn update_profile(
    gateway: &SessionGateway,
    previous: UserProfile,
    form: ProfileForm,
) -> Result<UserProfile, GatewayError> {
    let update = form.validate()?;
    let patch = fetch(gateway, &UpdateProfile(update)).await?;
    let profile = previous.merge(patch);
    cache_profile(gateway, &profile).await;
    Ok(profile)
}

#[tracing::instrument(name = "change_password", skip_all)]
pub async fn change_password(
    gateway: &SessionGateway,
    form: PasswordForm,
) -> Result<String, GatewayError> {
    let change = form.validate()?;
    fetch(gateway, &ChangePassword(change)).await?;
    Ok(PASSWORD_CHANGED_MESSAGE.to_string())
}

// Best-effort: a failed cache write never fails the profile call.
async fn cache_profile(gateway: &SessionGateway, profile: &UserProfile) {
    let Ok(value) = serde_json::to_value(profile) else {
        return;
    };
    if let Err(err) = gateway.session().store.cache_user(value).await {
        tracing::warn!(error = %err, "failed to cache user profile.");
    }
}
