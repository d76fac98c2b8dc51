pub mod nextpay;

pub use nextpay::NextpayClient;
