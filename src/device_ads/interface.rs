use std::error::Error;
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, PartialEq)]
pub struct RewardedAd {
    pub ad_unit_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reward {
    pub kind: String,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BannerAd {
    pub ad_unit_id: String,
    pub text: String,
}

pub type AdResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Ad network. Each call answers exactly once on the returned channel.
pub trait DeviceAds {
    fn load_rewarded(&self, ad_unit_id: &str) -> Receiver<AdResult<RewardedAd>>;
    /// Shows a loaded ad. An ad can be shown once.
    fn show_rewarded(&self, ad: RewardedAd) -> Receiver<AdResult<Reward>>;
    fn load_banner(&self, ad_unit_id: &str) -> Receiver<AdResult<BannerAd>>;
}
