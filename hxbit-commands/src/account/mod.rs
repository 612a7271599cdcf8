pub mod avatar;
pub mod editprofile;
pub mod profile;
pub mod signin;
pub mod signout;
pub mod signup;
pub mod username;
