use maud::{Markup, html};

use crate::paths;
use crate::view::layout::render_page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    Email,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginMessage {
    Success(String),
    Error(String),
}

fn render_message(message: Option<&LoginMessage>) -> Markup {
    html! {
        @match message {
            Some(LoginMessage::Success(text)) => { p class="notice success" role="status" { (text) } }
            Some(LoginMessage::Error(text)) => { p class="notice error" role="alert" { (text) } }
            None => {}
        }
    }
}

/// Two-step passwordless login: ask for an e-mail, then for the code sent to it.
#[must_use]
pub fn render_login_page(
    stage: LoginStage,
    email: &str,
    message: Option<&LoginMessage>,
) -> Markup {
    let body = html! {
        div class="card login-card" {
            h1 { "Sign in" }
            (render_message(message))
            @match stage {
                LoginStage::Email => {
                    form method="post" action=(paths::LOGIN_SEND_OTP) {
                        label for="email" { "Email address" }
                        input id="email" name="email" type="email" required value=(email)
                            placeholder="Enter your email to receive OTP";
                        button type="submit" class="button" { "Send OTP" }
                    }
                }
                LoginStage::Code => {
                    form method="post" action=(paths::LOGIN_VERIFY_OTP) {
                        input type="hidden" name="email" value=(email);
                        label for="code" { "Enter the OTP sent to your email" }
                        input id="code" name="code" type="text" inputmode="numeric"
                            autocomplete="one-time-code" maxlength="6" required;
                        button type="submit" class="button" { "Verify" }
                    }
                    form method="post" action=(paths::LOGIN_SEND_OTP) class="inline" {
                        input type="hidden" name="email" value=(email);
                        button type="submit" class="link" { "Send a new code" }
                    }
                }
            }
        }
    };
    render_page("Sign in", None, &body)
}
