//! Request and response types for the authentication API.

mod requests;
mod responses;

pub use requests::{
    DeviceContext, ForgotPasswordRequest, LoginRequest, OtpVerificationRequest, RefreshRequest,
    RegisterRequest, ResendOtpRequest, ResetPasswordRequest, SignOutRequest,
};
pub use responses::{
    DeviceInfoResponse, LoginResponse, MessageResponse, RegisterResponse, TokenPairResponse,
};
