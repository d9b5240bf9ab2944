//! 重置密码：六格 OTP + 新密码，带重发倒计时

use std::time::Duration;

use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use maison_shared::auth::{OTP_LENGTH, OtpInput, ResendCountdown, ResetPasswordForm};
use maison_shared::route::AppRoute;

use crate::auth::use_auth;
use crate::components::feedback::{InlineError, SuccessBanner};
use crate::components::fields::TextField;
use crate::web::SecondTicker;
use crate::web::router::{Link, use_router};

#[component]
pub fn ResetPasswordPage(email: String) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let resend_secs = auth.api().config().otp_resend_secs;

    let form = RwSignal::new(ResetPasswordForm::for_email(email.clone()));
    let (is_submitting, set_is_submitting) = signal(false);
    let error_msg = RwSignal::new(Option::<String>::None);
    let success_msg = RwSignal::new(Option::<String>::None);

    // 组件销毁时 StoredValue 被释放，计时器随之清除
    let countdown = RwSignal::new(ResendCountdown::start(resend_secs));
    let ticker = StoredValue::new_local(None::<SecondTicker>);
    let start_countdown = move || {
        countdown.set(ResendCountdown::start(resend_secs));
        // 归零或页面已卸载时停表
        let started = SecondTicker::start(move || countdown.try_update(|c| c.tick()).unwrap_or(false));
        if started.is_none() {
            log::warn!("resend countdown timer unavailable");
            countdown.set(ResendCountdown::start(0));
        }
        ticker.set_value(started);
    };
    start_countdown();

    let on_resend = move |_| {
        if !countdown.get_untracked().can_resend() {
            return;
        }
        let address = form.with_untracked(|f| f.email.clone());
        let api = auth.api();
        error_msg.set(None);
        spawn_local(async move {
            match api.forgot_password(&address).await {
                Ok(()) => {
                    success_msg.try_set(Some("A new code is on its way".to_string()));
                    start_countdown();
                }
                Err(e) => {
                    error_msg.try_set(Some(e.user_message()));
                }
            }
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        let values = form.get_untracked();
        // 本地校验失败时不发请求
        if let Err(e) = values.validate() {
            error_msg.set(Some(e.to_string()));
            return;
        }

        set_is_submitting.set(true);
        error_msg.set(None);

        let api = auth.api();
        spawn_local(async move {
            match api.reset_password(&values).await {
                Ok(text) => {
                    success_msg.try_set(Some(if text.is_empty() {
                        "Password reset successful".to_string()
                    } else {
                        text
                    }));
                    set_timeout(move || router.go(AppRoute::Login), Duration::from_millis(2000));
                }
                Err(e) => {
                    error_msg.try_set(Some(e.user_message()));
                    form.try_update(|f| f.otp.clear());
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="font-serif text-4xl mb-2">"Reset Password"</h1>
                    <p class="text-base-content/70">
                        "Enter the code sent to " <span class="font-medium">{email}</span>
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <InlineError message=error_msg />
                        <SuccessBanner message=success_msg />

                        <OtpBoxes form=form />

                        <TextField label="New Password" id="password" kind="password" autocomplete="new-password"
                            value=Signal::derive(move || form.with(|f| f.password.clone()))
                            on_input=move |v: String| form.update(|f| f.password = v) />
                        <TextField label="Confirm Password" id="confirm" kind="password" autocomplete="new-password"
                            value=Signal::derive(move || form.with(|f| f.confirm.clone()))
                            on_input=move |v: String| form.update(|f| f.confirm = v) />

                        <div class="form-control mt-6">
                            <button class="btn btn-primary tracking-widest uppercase" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Resetting..." }.into_any()
                                } else {
                                    "Reset Password".into_any()
                                }}
                            </button>
                        </div>

                        <div class="text-center text-sm mt-4">
                            {move || {
                                let c = countdown.get();
                                if c.can_resend() {
                                    view! {
                                        <button type="button" class="link link-primary" on:click=on_resend>"Resend code"</button>
                                    }.into_any()
                                } else {
                                    view! {
                                        <span class="text-base-content/60">{format!("Resend code in {}s", c.remaining())}</span>
                                    }.into_any()
                                }
                            }}
                        </div>
                        <p class="text-center text-sm">
                            <Link to="/login" class="link link-hover">"Back to sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}

/// 六格验证码输入：输入后右移，退格左移，支持整段粘贴
#[component]
fn OtpBoxes(form: RwSignal<ResetPasswordForm>) -> impl IntoView {
    let boxes: [NodeRef<Input>; OTP_LENGTH] = std::array::from_fn(|_| NodeRef::new());

    let focus = move |index: Option<usize>| {
        if let Some(input) = index.and_then(|i| boxes.get(i)).and_then(|r| r.get_untracked()) {
            let _ = input.focus();
            input.select();
        }
    };

    let update_otp = move |f: &dyn Fn(&mut OtpInput) -> Option<usize>| {
        let next = form.try_update(|form| f(&mut form.otp)).flatten();
        focus(next);
    };

    view! {
        <div class="flex justify-center gap-2 my-4">
            {(0..OTP_LENGTH).map(|index| {
                let digit = move || {
                    form.with(|f| f.otp.digit(index).map(String::from).unwrap_or_default())
                };
                view! {
                    <input
                        node_ref=boxes[index]
                        type="text"
                        inputmode="numeric"
                        autocomplete="one-time-code"
                        maxlength="6"
                        aria-label=format!("Digit {}", index + 1)
                        class="input input-bordered w-12 h-14 text-center text-xl font-mono"
                        prop:value=digit
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            update_otp(&|otp: &mut OtpInput| otp.input(index, &value));
                        }
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            match ev.key().as_str() {
                                "Backspace" => focus(form.with_untracked(|f| f.otp.backspace(index))),
                                "ArrowLeft" => focus(OtpInput::move_left(index)),
                                "ArrowRight" => focus(OtpInput::move_right(index)),
                                _ => {}
                            }
                        }
                        on:paste=move |ev: web_sys::ClipboardEvent| {
                            ev.prevent_default();
                            let text = ev
                                .clipboard_data()
                                .and_then(|data| data.get_data("text").ok())
                                .unwrap_or_default();
                            update_otp(&|otp: &mut OtpInput| Some(otp.paste(&text)));
                        }
                    />
                }
            }).collect_view()}
        </div>
    }
}
