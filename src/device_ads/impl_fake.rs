use crate::device_ads::interface::{AdResult, BannerAd, DeviceAds, Reward, RewardedAd};
use crate::library::logger::interface::Logger;
use rand::Rng;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Duration;

/// Answers every request after `latency`, filling it with probability `fill_rate`.
pub struct DeviceAdsFake {
    logger: Arc<dyn Logger + Send + Sync>,
    latency: Duration,
    fill_rate: f32,
}

impl DeviceAdsFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, latency: Duration, fill_rate: f32) -> Self {
        Self {
            logger: logger.with_namespace("ads").with_namespace("fake"),
            latency,
            fill_rate: fill_rate.clamp(0.0, 1.0),
        }
    }

    fn respond<T, F>(&self, request: String, fill: F) -> Receiver<AdResult<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = channel();
        let latency = self.latency;
        let fill_rate = self.fill_rate;
        let logger = self.logger.clone();

        std::thread::spawn(move || {
            std::thread::sleep(latency);

            let filled = rand::rng().random_bool(fill_rate as f64);
            let result = if filled {
                let _ = logger.info(&format!("{} filled", request));
                Ok(fill())
            } else {
                let _ = logger.info(&format!("{} not filled", request));
                Err(format!("no fill for {}", request).into())
            };

            let _ = tx.send(result);
        });

        rx
    }
}

impl DeviceAds for DeviceAdsFake {
    fn load_rewarded(&self, ad_unit_id: &str) -> Receiver<AdResult<RewardedAd>> {
        let ad = RewardedAd {
            ad_unit_id: ad_unit_id.to_string(),
        };
        self.respond(format!("rewarded ad {}", ad_unit_id), move || ad)
    }

    fn show_rewarded(&self, ad: RewardedAd) -> Receiver<AdResult<Reward>> {
        let (tx, rx) = channel();
        let latency = self.latency;
        let logger = self.logger.clone();

        std::thread::spawn(move || {
            std::thread::sleep(latency);
            let _ = logger.info(&format!("User earned the reward from {}", ad.ad_unit_id));
            let _ = tx.send(Ok(Reward {
                kind: "remedy".to_string(),
                amount: 1,
            }));
        });

        rx
    }

    fn load_banner(&self, ad_unit_id: &str) -> Receiver<AdResult<BannerAd>> {
        let banner = BannerAd {
            ad_unit_id: ad_unit_id.to_string(),
            text: "Test Ad: quality seeds and fertiliser near you".to_string(),
        };
        self.respond(format!("banner ad {}", ad_unit_id), move || banner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_memory::LoggerMemory;

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[test]
    fn test_full_fill_rate_always_loads() {
        let ads = DeviceAdsFake::new(Arc::new(LoggerMemory::new()), Duration::ZERO, 1.0);

        let ad = ads
            .load_rewarded("rewarded-unit")
            .recv_timeout(TIMEOUT)
            .unwrap()
            .unwrap();
        assert_eq!(ad.ad_unit_id, "rewarded-unit");

        let banner = ads
            .load_banner("banner-unit")
            .recv_timeout(TIMEOUT)
            .unwrap()
            .unwrap();
        assert_eq!(banner.ad_unit_id, "banner-unit");
    }

    #[test]
    fn test_zero_fill_rate_never_loads() {
        let logger = LoggerMemory::new();
        let ads = DeviceAdsFake::new(Arc::new(logger.clone()), Duration::ZERO, 0.0);

        let result = ads.load_rewarded("rewarded-unit").recv_timeout(TIMEOUT).unwrap();

        assert!(result.is_err());
        assert!(logger.contains("not filled"));
    }

    #[test]
    fn test_show_grants_reward() {
        let ads = DeviceAdsFake::new(Arc::new(LoggerMemory::new()), Duration::ZERO, 1.0);
        let ad = RewardedAd {
            ad_unit_id: "rewarded-unit".to_string(),
        };

        let reward = ads.show_rewarded(ad).recv_timeout(TIMEOUT).unwrap().unwrap();

        assert_eq!(reward.amount, 1);
    }
}
