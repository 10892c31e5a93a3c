//! Static routing data: blocked-region pattern, the ordered region catalog,
//! selection group names and the rule list.
//!
//! Everything here is fixed configuration consumed by the pipeline; none of
//! it is computed at run time.

use once_cell::sync::Lazy;
use regex::Regex;

/// URL the client uses for group health checks.
pub const HEALTH_CHECK_URL: &str = "https://www.google.com/";

/// Host:port anchoring the probe's network-availability context. Logged for
/// operators; the prober itself dials each node's own endpoint.
pub const PROBE_CONTEXT: &str = "www.google.com:443";

// Fixed selection group names. Order of the non-region groups in the output
// follows GroupTemplate::default.
pub const GROUP_ENTRY: &str = "🚀 选择代理";
pub const GROUP_AUTO: &str = "♻ 自动选择";
pub const GROUP_FASTEST: &str = "🔰 延迟最低";
pub const GROUP_MANUAL: &str = "✅ 手动选择";
pub const GROUP_UNLOCK: &str = "🌐 突破锁区";
pub const GROUP_SUSPECT_CN: &str = "❓ 疑似国内";
pub const GROUP_FINAL: &str = "🐟 漏网之鱼";
pub const GROUP_MALWARE: &str = "🚨 病毒网站";
pub const GROUP_ADBLOCK: &str = "⛔ 广告拦截";
pub const GROUP_REGION: &str = "🗺️ 选择地区";

/// Regions whose nodes are removed outright: mainland China, Hong Kong,
/// Taiwan and Vietnam, matched by flag, ISO code or native name.
pub static BLOCKED_REGION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:🇨🇳|🇭🇰|🇹🇼|🇻🇳|CN|HK|TW|VN|中国|香港|台湾|越南|China|Hong.?Kong|Taiwan|Vietnam|回国)",
    )
    .expect("invalid blocked-region regex")
});

/// One region classification rule: first pattern to match a node name wins.
#[derive(Debug, Clone)]
pub struct RegionRule {
    pub pattern: Regex,
    pub label: &'static str,
}

impl RegionRule {
    fn new(pattern: &str, label: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("invalid region regex"),
            label,
        }
    }
}

/// The fixed, ordered region catalog. Evaluation order is precedence order,
/// so keep this a list, never a map.
pub static REGION_CATALOG: Lazy<Vec<RegionRule>> = Lazy::new(|| {
    vec![
        RegionRule::new(r"(?i)(?:🇯🇵|JP|日本|Japan|东京|大阪)", "🇯🇵 日本"),
        RegionRule::new(
            r"(?i)(?:🇺🇸|US|美国|United.?States|洛杉矶|硅谷|纽约|达拉斯|凤凰城|西雅图)",
            "🇺🇸 美国",
        ),
        RegionRule::new(r"(?i)(?:🇸🇬|SG|新加坡|Singapore|狮城)", "🇸🇬 新加坡"),
        RegionRule::new(r"(?i)(?:🇰🇷|KR|韩国|Korea|首尔)", "🇰🇷 韩国"),
        RegionRule::new(r"(?i)(?:🇬🇧|UK|GB|英国|United.?Kingdom|伦敦)", "🇬🇧 英国"),
        RegionRule::new(r"(?i)(?:🇩🇪|DE|德国|Germany|法兰克福)", "🇩🇪 德国"),
        RegionRule::new(r"(?i)(?:🇫🇷|FR|法国|France|巴黎)", "🇫🇷 法国"),
        RegionRule::new(r"(?i)(?:🇷🇺|RU|俄罗斯|Russia|莫斯科)", "🇷🇺 俄罗斯"),
        RegionRule::new(r"(?i)(?:🇨🇦|CA|加拿大|Canada)", "🇨🇦 加拿大"),
        RegionRule::new(r"(?i)(?:🇦🇺|AU|澳大利亚|Australia|悉尼)", "🇦🇺 澳大利亚"),
        RegionRule::new(r"(?i)(?:🇮🇳|IN|印度|India|孟买)", "🇮🇳 印度"),
        RegionRule::new(r"(?i)(?:🇧🇷|BR|巴西|Brazil)", "🇧🇷 巴西"),
    ]
});

/// Names and parameters of the fixed non-region groups, plus the full region
/// label list the assembler must emit groups for.
#[derive(Debug, Clone)]
pub struct GroupTemplate {
    pub entry: String,
    pub auto: String,
    pub fastest: String,
    pub manual: String,
    pub unlock: String,
    pub suspect_cn: String,
    pub final_catch: String,
    pub malware: String,
    pub adblock: String,
    pub region_selector: String,
    pub health_check_url: String,
    pub interval: u32,
    pub tolerance: u32,
    pub region_labels: Vec<String>,
}

impl Default for GroupTemplate {
    fn default() -> Self {
        Self {
            entry: GROUP_ENTRY.to_string(),
            auto: GROUP_AUTO.to_string(),
            fastest: GROUP_FASTEST.to_string(),
            manual: GROUP_MANUAL.to_string(),
            unlock: GROUP_UNLOCK.to_string(),
            suspect_cn: GROUP_SUSPECT_CN.to_string(),
            final_catch: GROUP_FINAL.to_string(),
            malware: GROUP_MALWARE.to_string(),
            adblock: GROUP_ADBLOCK.to_string(),
            region_selector: GROUP_REGION.to_string(),
            health_check_url: HEALTH_CHECK_URL.to_string(),
            interval: 300,
            tolerance: 20,
            region_labels: REGION_CATALOG.iter().map(|r| r.label.to_string()).collect(),
        }
    }
}

/// The static rule list: ad blocking, malware, domestic direct, overseas
/// proxy, streaming unlock, then GeoIP and final catch-alls.
pub fn default_rules() -> Vec<String> {
    [
        "DOMAIN-SUFFIX,ads.google.com,⛔ 广告拦截",
        "DOMAIN-SUFFIX,adservice.google.com,⛔ 广告拦截",
        "DOMAIN-SUFFIX,googleadservices.com,⛔ 广告拦截",
        "DOMAIN-SUFFIX,doubleclick.net,⛔ 广告拦截",
        "DOMAIN-SUFFIX,ad.com,⛔ 广告拦截",
        "DOMAIN-SUFFIX,adnxs.com,⛔ 广告拦截",
        "DOMAIN-SUFFIX,adsrvr.org,⛔ 广告拦截",
        "DOMAIN-SUFFIX,pgdt.ugdtimg.com,⛔ 广告拦截",
        "DOMAIN-KEYWORD,adservice,⛔ 广告拦截",
        "DOMAIN-KEYWORD,tracking,⛔ 广告拦截",
        "DOMAIN-SUFFIX,malware-site.example,🚨 病毒网站",
        "DOMAIN-SUFFIX,cn,DIRECT",
        "DOMAIN-SUFFIX,baidu.com,DIRECT",
        "DOMAIN-SUFFIX,qq.com,DIRECT",
        "DOMAIN-SUFFIX,taobao.com,DIRECT",
        "DOMAIN-SUFFIX,tmall.com,DIRECT",
        "DOMAIN-SUFFIX,jd.com,DIRECT",
        "DOMAIN-SUFFIX,alipay.com,DIRECT",
        "DOMAIN-SUFFIX,163.com,DIRECT",
        "DOMAIN-SUFFIX,126.com,DIRECT",
        "DOMAIN-SUFFIX,weibo.com,DIRECT",
        "DOMAIN-SUFFIX,bilibili.com,DIRECT",
        "DOMAIN-SUFFIX,zhihu.com,DIRECT",
        "DOMAIN-SUFFIX,douyin.com,DIRECT",
        "DOMAIN-SUFFIX,toutiao.com,DIRECT",
        "DOMAIN-SUFFIX,csdn.net,DIRECT",
        "DOMAIN-SUFFIX,aliyun.com,DIRECT",
        "DOMAIN-SUFFIX,aliyuncs.com,DIRECT",
        "DOMAIN-SUFFIX,tencentcloud.com,DIRECT",
        "DOMAIN-SUFFIX,meituan.com,DIRECT",
        "DOMAIN-SUFFIX,dianping.com,DIRECT",
        "DOMAIN-SUFFIX,mi.com,DIRECT",
        "DOMAIN-SUFFIX,xiaomi.com,DIRECT",
        "DOMAIN-SUFFIX,google.com,🚀 选择代理",
        "DOMAIN-SUFFIX,google.co.jp,🚀 选择代理",
        "DOMAIN-SUFFIX,googleapis.com,🚀 选择代理",
        "DOMAIN-SUFFIX,gstatic.com,🚀 选择代理",
        "DOMAIN-SUFFIX,youtube.com,🚀 选择代理",
        "DOMAIN-SUFFIX,ytimg.com,🚀 选择代理",
        "DOMAIN-SUFFIX,googlevideo.com,🚀 选择代理",
        "DOMAIN-SUFFIX,gmail.com,🚀 选择代理",
        "DOMAIN-SUFFIX,github.com,🚀 选择代理",
        "DOMAIN-SUFFIX,githubusercontent.com,🚀 选择代理",
        "DOMAIN-SUFFIX,twitter.com,🚀 选择代理",
        "DOMAIN-SUFFIX,x.com,🚀 选择代理",
        "DOMAIN-SUFFIX,twimg.com,🚀 选择代理",
        "DOMAIN-SUFFIX,facebook.com,🚀 选择代理",
        "DOMAIN-SUFFIX,fbcdn.net,🚀 选择代理",
        "DOMAIN-SUFFIX,instagram.com,🚀 选择代理",
        "DOMAIN-SUFFIX,whatsapp.com,🚀 选择代理",
        "DOMAIN-SUFFIX,telegram.org,🚀 选择代理",
        "DOMAIN-SUFFIX,t.me,🚀 选择代理",
        "DOMAIN-SUFFIX,wikipedia.org,🚀 选择代理",
        "DOMAIN-SUFFIX,reddit.com,🚀 选择代理",
        "DOMAIN-SUFFIX,netflix.com,🚀 选择代理",
        "DOMAIN-SUFFIX,nflxvideo.net,🚀 选择代理",
        "DOMAIN-SUFFIX,spotify.com,🚀 选择代理",
        "DOMAIN-SUFFIX,discord.com,🚀 选择代理",
        "DOMAIN-SUFFIX,discordapp.com,🚀 选择代理",
        "DOMAIN-SUFFIX,openai.com,🚀 选择代理",
        "DOMAIN-SUFFIX,claude.ai,🚀 选择代理",
        "DOMAIN-SUFFIX,anthropic.com,🚀 选择代理",
        "DOMAIN-SUFFIX,chatgpt.com,🚀 选择代理",
        "DOMAIN-SUFFIX,amazonaws.com,🚀 选择代理",
        "DOMAIN-SUFFIX,cloudflare.com,🚀 选择代理",
        "DOMAIN-SUFFIX,microsoft.com,🚀 选择代理",
        "DOMAIN-SUFFIX,apple.com,🚀 选择代理",
        "DOMAIN-SUFFIX,icloud.com,🚀 选择代理",
        "DOMAIN-SUFFIX,amazon.com,🚀 选择代理",
        "DOMAIN-SUFFIX,twitch.tv,🚀 选择代理",
        "DOMAIN-SUFFIX,steam.com,🚀 选择代理",
        "DOMAIN-SUFFIX,steampowered.com,🚀 选择代理",
        "DOMAIN-SUFFIX,steamcommunity.com,🚀 选择代理",
        "DOMAIN-SUFFIX,pixiv.net,🚀 选择代理",
        "DOMAIN-SUFFIX,pximg.net,🚀 选择代理",
        "DOMAIN-SUFFIX,docker.com,🚀 选择代理",
        "DOMAIN-SUFFIX,docker.io,🚀 选择代理",
        "DOMAIN-SUFFIX,npmjs.org,🚀 选择代理",
        "DOMAIN-SUFFIX,pypi.org,🚀 选择代理",
        "DOMAIN-SUFFIX,huggingface.co,🚀 选择代理",
        "DOMAIN-SUFFIX,medium.com,🚀 选择代理",
        "DOMAIN-SUFFIX,stackoverflow.com,🚀 选择代理",
        "DOMAIN-SUFFIX,hulu.com,🌐 突破锁区",
        "DOMAIN-SUFFIX,hbo.com,🌐 突破锁区",
        "DOMAIN-SUFFIX,hbomax.com,🌐 突破锁区",
        "DOMAIN-SUFFIX,disneyplus.com,🌐 突破锁区",
        "DOMAIN-SUFFIX,disney-plus.net,🌐 突破锁区",
        "DOMAIN-SUFFIX,primevideo.com,🌐 突破锁区",
        "DOMAIN-SUFFIX,dazn.com,🌐 突破锁区",
        "GEOIP,CN,❓ 疑似国内",
        "MATCH,🐟 漏网之鱼",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
