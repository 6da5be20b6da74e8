use suncal::components::google_calendar::token::{
    write_token_file, AuthorizedUser, TokenResponse, CALENDAR_SCOPE, GOOGLE_TOKEN_URI,
};
use suncal::config::Config;
use suncal::error::{config_error, other_error, token_error, SunResult};
use url::Url;

#[tokio::main]
async fn main() -> miette::Result<()> {
    authorize().await?;
    Ok(())
}

async fn authorize() -> SunResult<()> {
    // Load configuration
    let config = Config::load()?;

    let client_id = config
        .google_client_id
        .clone()
        .ok_or_else(|| config_error("GOOGLE_CLIENT_ID must be set"))?;
    let client_secret = config
        .google_client_secret
        .clone()
        .ok_or_else(|| config_error("GOOGLE_CLIENT_SECRET must be set"))?;
    let redirect_uri = format!("http://localhost:{}", config.oauth_port);

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    // Construct authorization URL
    let mut auth_url = Url::parse("https://accounts.google.com/o/oauth2/v2/auth")
        .map_err(|e| other_error(&format!("Failed to parse URL: {}", e)))?;
    auth_url
        .query_pairs_mut()
        .append_pair("client_id", &client_id)
        .append_pair("redirect_uri", &redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", CALENDAR_SCOPE)
        .append_pair("state", &state);

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser. Visit this URL instead:\n{}", auth_url);
    }

    // Start local server to receive the callback
    let server = tiny_http::Server::http(("127.0.0.1", config.oauth_port))
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    // Handle the callback
    let request = server.recv()?;
    let callback = Url::parse(&format!("{}{}", redirect_uri, request.url()))
        .map_err(|e| other_error(&format!("Invalid callback URL: {}", e)))?;

    let param = |name: &str| {
        callback
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if param("state").as_deref() != Some(state.as_str()) {
        return Err(token_error("Callback state does not match the request"));
    }
    let code = param("code").ok_or_else(|| token_error("No authorization code found in callback"))?;

    // Exchange code for tokens
    let client = reqwest::Client::new();
    let response = client
        .post(GOOGLE_TOKEN_URI)
        .form(&[
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(token_error(&format!("Failed to get token: {}", error_text)));
    }

    let token: TokenResponse = response.json().await?;

    let mut user = AuthorizedUser {
        client_id: Some(client_id),
        client_secret: Some(client_secret),
        scopes: vec![CALENDAR_SCOPE.to_string()],
        token_uri: GOOGLE_TOKEN_URI.to_string(),
        ..Default::default()
    };
    user.apply(token, chrono::Utc::now());

    if user.refresh_token.is_none() {
        println!("Warning: no refresh token was issued; the token will stop working when it expires.");
    }

    write_token_file(&config.token_file, &user).await?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response)?;

    println!("Token saved to {}", config.token_file.display());

    Ok(())
}
