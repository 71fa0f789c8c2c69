//! Built-in level catalog: the SkyStack story arc, used when no config replaces it.

use crate::domain::{
  AnswerOption, Block, ChallengeSpec, ChallengeType, ChoiceQuestion, Difficulty, LevelDefinition, Puzzle,
  Requirement,
};

fn opt(id: &str, label: &str, explanation: &str) -> AnswerOption {
  AnswerOption { id: id.into(), label: label.into(), explanation: Some(explanation.into()) }
}

fn question(prompt: &str, correct: &str, options: Vec<AnswerOption>) -> ChoiceQuestion {
  ChoiceQuestion { prompt: prompt.into(), options, correct: correct.into(), explanation: None }
}

/// Quiz question whose explanation is shared by every option.
fn quiz_question(prompt: &str, options: &[&str], correct: usize, explanation: &str) -> ChoiceQuestion {
  ChoiceQuestion {
    prompt: prompt.into(),
    options: options
      .iter()
      .enumerate()
      .map(|(i, label)| AnswerOption { id: i.to_string(), label: (*label).into(), explanation: None })
      .collect(),
    correct: correct.to_string(),
    explanation: Some(explanation.into()),
  }
}

fn puzzle(scrambled: &str, answer: &str, category: &str, clue: &str, hint: &str) -> Puzzle {
  Puzzle {
    scrambled: scrambled.into(),
    answer: answer.into(),
    category: category.into(),
    clue: clue.into(),
    hint: hint.into(),
  }
}

fn requirement(description: &str, token: &str) -> Requirement {
  Requirement { description: description.into(), token: token.into() }
}

fn block(id: &str, label: &str) -> Block {
  Block { id: id.into(), label: label.into() }
}

#[allow(clippy::too_many_arguments)]
fn level(
  id: &str,
  title: &str,
  description: &str,
  difficulty: Difficulty,
  xp_reward: u32,
  badge: &str,
  prerequisites: &[&str],
  briefing: &str,
  debrief: &str,
  challenge: ChallengeSpec,
) -> LevelDefinition {
  LevelDefinition {
    id: id.into(),
    title: title.into(),
    description: description.into(),
    difficulty,
    challenge_type: challenge.challenge_type(),
    xp_reward,
    badge: Some(badge.into()),
    prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
    briefing: briefing.into(),
    debrief: debrief.into(),
    challenge,
  }
}

pub fn seed_levels() -> Vec<LevelDefinition> {
  vec![
    level(
      "ec2-basics",
      "EC2 Instance Setup",
      "Help Nova launch her first EC2 instance and configure security groups",
      Difficulty::Beginner,
      100,
      "EC2 Novice",
      &[],
      "Nova: 'Echo, I need to launch my first EC2 instance for our client. Can you guide me through the process?'",
      "Echo: 'Excellent work, Nova! Choosing the right AMI and security groups is crucial for both performance and security.'",
      ChallengeSpec::ChoiceSet {
        questions: vec![
          question(
            "Which AMI should Nova choose for a basic web server?",
            "amazon-linux",
            vec![
              opt("windows", "Windows Server 2022", "Overkill for a simple web server and more expensive"),
              opt("amazon-linux", "Amazon Linux 2023", "Perfect! Optimized for AWS and great for web servers"),
              opt("deep-learning", "Deep Learning AMI", "This is for AI/ML workloads, not web servers"),
              opt("sap", "SAP Business One", "This is for enterprise SAP applications"),
            ],
          ),
          question(
            "What instance type is best for Nova's small web server?",
            "t3.micro",
            vec![
              opt("t3.micro", "t3.micro", "Perfect! Burstable performance for small workloads"),
              opt("c5.24xlarge", "c5.24xlarge", "Way too powerful (and expensive!) for a small web server"),
              opt("m5.large", "m5.large", "Good option but overkill for a small web server"),
              opt("r5.xlarge", "r5.xlarge", "Memory-optimized instances are for high-memory workloads"),
            ],
          ),
          question(
            "Which security group rule should Nova add for web traffic?",
            "http-https",
            vec![
              opt("ssh-only", "Allow SSH (port 22) only", "This only allows SSH access, not web traffic"),
              opt("all-traffic", "Allow all traffic from anywhere", "Security risk! Never allow all traffic"),
              opt("http-https", "Allow HTTP (80) and HTTPS (443)", "Correct! This allows web traffic securely"),
              opt("database", "Allow MySQL (3306)", "This is for database access, not web traffic"),
            ],
          ),
        ],
      },
    ),
    level(
      "word-puzzle",
      "Decode the Transmission",
      "Unscramble intercepted AWS service names",
      Difficulty::Beginner,
      120,
      "Code Breaker",
      &["ec2-basics"],
      "Echo: 'Nova, I've intercepted some encrypted AWS communications! Can you help me decode these scrambled service names?'",
      "Nova: 'That was like solving a digital puzzle! I feel much more confident with AWS terminology now.'",
      ChallengeSpec::Decoding {
        puzzles: vec![
          puzzle(
            "3CE2",
            "EC2",
            "Compute",
            "Nova needs virtual machines to host her applications. What AWS service provides scalable computing capacity?",
            "Elastic Compute Cloud - Virtual servers in AWS",
          ),
          puzzle(
            "MAI",
            "IAM",
            "Security",
            "Echo is setting up security policies to control access. What service manages users and permissions?",
            "Identity and Access Management - Controls who can access what",
          ),
          puzzle(
            "3S",
            "S3",
            "Storage",
            "Nova needs to store her website's images and files. What AWS storage service should she use?",
            "Simple Storage Service - Object storage for the cloud",
          ),
          puzzle(
            "CPV",
            "VPC",
            "Networking",
            "Echo wants to create a secure, isolated network for Nova's resources. What should they set up?",
            "Virtual Private Cloud - Your own isolated network in AWS",
          ),
          puzzle(
            "BDALMA",
            "LAMBDA",
            "Compute",
            "Nova wants to run code without worrying about servers. What serverless service should she use?",
            "Serverless compute service - Run code without managing servers",
          ),
        ],
      },
    ),
    level(
      "iam-policy",
      "IAM Fundamentals",
      "Answer Echo's questions on least privilege, roles and temporary access",
      Difficulty::Beginner,
      150,
      "Security Conscious",
      &["ec2-basics"],
      "Echo: 'Now Nova, let's tackle IAM. Security is paramount in cloud engineering.'",
      "Nova: 'I'm getting the hang of this! Following the principle of least privilege really makes sense now.'",
      ChallengeSpec::Quiz {
        pass_threshold: 3,
        questions: vec![
          quiz_question(
            "Nova needs developers to access only the 'dev-bucket' S3 bucket. Which principle should she follow?",
            &[
              "Grant full S3 access to make development easier",
              "Apply the principle of least privilege - only grant necessary permissions",
              "Use the AWS managed PowerUserAccess policy",
              "Grant administrator access temporarily",
            ],
            1,
            "Least privilege grants only the minimum permissions needed, which reduces security risk.",
          ),
          quiz_question(
            "A developer can't access an S3 bucket despite an IAM policy that allows it. What should Nova check first?",
            &[
              "The bucket's public access settings",
              "If there's a conflicting bucket policy or explicit DENY statement",
              "The developer's internet connection",
              "The S3 service status page",
            ],
            1,
            "An explicit DENY in any policy overrides every ALLOW. Bucket policies can also restrict access.",
          ),
          quiz_question(
            "Nova wants a Lambda function to read from DynamoDB. What's the best approach?",
            &[
              "Hardcode AWS credentials in the Lambda function code",
              "Create an IAM role with DynamoDB read permissions and attach it to Lambda",
              "Use the root account credentials",
              "Share IAM user credentials via environment variables",
            ],
            1,
            "IAM roles are the secure way to grant AWS services permissions. Never hardcode credentials.",
          ),
          quiz_question(
            "A user gets 'Access Denied' when trying to assume an IAM role. What could be the issue?",
            &[
              "The user's password has expired",
              "The role's trust policy doesn't allow the user to assume it",
              "The user needs to restart their computer",
              "The AWS region is incorrect",
            ],
            1,
            "The trust policy defines who can assume a role.",
          ),
          quiz_question(
            "Nova needs to grant temporary access to an external contractor. What's the most secure approach?",
            &[
              "Create a permanent IAM user with full access",
              "Share the root account password",
              "Use AWS STS to create temporary credentials with specific permissions",
              "Create an IAM user and delete it manually later",
            ],
            2,
            "STS issues temporary, limited-privilege credentials that expire on their own.",
          ),
        ],
      },
    ),
    level(
      "iam-policy-writer",
      "IAM Policy Creation",
      "Write a secure IAM policy granting read/write access to the dev bucket only",
      Difficulty::Intermediate,
      175,
      "Policy Author",
      &["iam-policy"],
      "Echo: 'Time to write the policy yourself. Grant the developers object read and write on dev-bucket, nothing more.'",
      "Echo: 'Tight and readable. That policy would pass any security review.'",
      ChallengeSpec::PolicyForm {
        instructions: "Write an identity policy (JSON) that allows reading and writing objects in dev-bucket only.".into(),
        template: "{\n  \"Version\": \"\",\n  \"Statement\": [\n    {\n      \"Effect\": \"\",\n      \"Action\": [],\n      \"Resource\": \"\"\n    }\n  ]\n}".into(),
        requirements: vec![
          requirement("Policy language version 2012-10-17", "2012-10-17"),
          requirement("An Allow effect", "\"Allow\""),
          requirement("The s3:GetObject action", "s3:GetObject"),
          requirement("The s3:PutObject action", "s3:PutObject"),
          requirement("The dev-bucket object ARN", "arn:aws:s3:::dev-bucket/*"),
        ],
      },
    ),
    level(
      "terraform-vpc",
      "Terraform VPC",
      "Use Infrastructure as Code to create a VPC with subnets",
      Difficulty::Intermediate,
      200,
      "IaC Architect",
      &["iam-policy"],
      "Nova: 'Infrastructure as Code sounds intimidating... How do I use Terraform to create a VPC?'",
      "Echo: 'Outstanding! This VPC will be reproducible and version-controlled.'",
      ChallengeSpec::Arrangement {
        instructions: "Arrange the Terraform blocks in dependency order.".into(),
        blocks: vec![
          block("subnet", "resource \"aws_subnet\" \"public\""),
          block("provider", "provider \"aws\""),
          block("route-table", "resource \"aws_route_table\" \"public\""),
          block("vpc", "resource \"aws_vpc\" \"main\""),
          block("igw", "resource \"aws_internet_gateway\" \"gw\""),
        ],
        solution: vec![
          "provider".into(),
          "vpc".into(),
          "igw".into(),
          "subnet".into(),
          "route-table".into(),
        ],
      },
    ),
    level(
      "vpc-design",
      "VPC Design Review",
      "Choose the right CIDR and subnet settings for Nova's network",
      Difficulty::Intermediate,
      200,
      "Network Planner",
      &["terraform-vpc"],
      "Echo: 'Before we apply, let's review the design choices.'",
      "Nova: 'Room to grow and public where it needs to be. Got it!'",
      ChallengeSpec::Quiz {
        pass_threshold: 2,
        questions: vec![
          quiz_question(
            "What's the correct order for creating VPC infrastructure with Terraform?",
            &[
              "Subnets → VPC → Provider → Internet Gateway",
              "Provider → VPC → Internet Gateway → Subnets",
              "Internet Gateway → Provider → VPC → Subnets",
              "VPC → Provider → Subnets → Internet Gateway",
            ],
            1,
            "The provider comes first, subnets and gateways need a VPC to attach to.",
          ),
          quiz_question(
            "Which CIDR block is best for Nova's VPC that needs room for growth?",
            &[
              "10.0.0.0/16 (65,536 IPs)",
              "10.0.0.0/24 (256 IPs)",
              "0.0.0.0/0 (All IPs)",
              "192.168.1.0/16 (65,536 IPs)",
            ],
            0,
            "A /16 starting at .0.0 leaves plenty of space for subnets.",
          ),
          quiz_question(
            "How should Nova configure her public subnet in Terraform?",
            &[
              "map_public_ip_on_launch = false",
              "map_public_ip_on_launch = true + Internet Gateway route",
              "Only create route table, no map_public_ip setting",
              "Use NAT Gateway instead of Internet Gateway",
            ],
            1,
            "Public IPs on launch plus a route to the Internet Gateway make a subnet public.",
          ),
        ],
      },
    ),
    level(
      "troubleshooting",
      "Production Troubleshooting",
      "Diagnose connectivity, performance and security incidents",
      Difficulty::Advanced,
      250,
      "Pipeline Pro",
      &["terraform-vpc"],
      "Echo: 'Time for some real-world problem solving, Nova. When things go wrong in production, think fast and systematically.'",
      "Nova: 'I feel much more confident about handling AWS issues now. Troubleshooting is like detective work!'",
      ChallengeSpec::ChoiceSet {
        questions: vec![
          question(
            "Nova can't SSH to her EC2 instance. What's the most likely cause?",
            "sg-ssh",
            vec![
              opt("wrong-az", "Instance is in wrong AZ", "Availability Zone doesn't affect SSH connectivity"),
              opt("sg-ssh", "Security group missing SSH rule (port 22)", "Correct! Security groups act as firewalls - SSH needs port 22 open"),
              opt("too-small", "Instance type is too small", "Instance size doesn't affect SSH connectivity"),
              opt("bad-ami", "AMI is corrupted", "A corrupted AMI would prevent the instance from starting entirely"),
            ],
          ),
          question(
            "Nova's web app is slow. Which CloudWatch metric should she check first?",
            "cpu",
            vec![
              opt("packets", "NetworkPacketsIn", "Network packets don't directly indicate performance issues"),
              opt("cpu", "CPUUtilization", "Perfect! High CPU is often the first sign of performance issues"),
              opt("status", "StatusCheckFailed", "Status checks indicate health, not performance bottlenecks"),
              opt("disk", "DiskReadBytes", "Disk reads matter but CPU is typically checked first for web apps"),
            ],
          ),
          question(
            "Nova found suspicious API calls in CloudTrail. What should she do first?",
            "rotate",
            vec![
              opt("delete-users", "Delete all IAM users immediately", "Too extreme - this could break legitimate access"),
              opt("ignore", "Ignore it if apps are working", "Never ignore suspicious activity in security logs!"),
              opt("rotate", "Rotate credentials for affected users/roles", "Correct! Rotating credentials prevents further unauthorized access"),
              opt("disable-trail", "Turn off CloudTrail logging", "This would make the security situation worse, not better!"),
            ],
          ),
        ],
      },
    ),
    level(
      "infrastructure-design",
      "Client Architecture Presentation",
      "Present a highly available cloud architecture to SkyStack's biggest client",
      Difficulty::Advanced,
      500,
      "Cloud Architect",
      &["troubleshooting", "vpc-design"],
      "Nova: 'This client needs a highly available architecture. How do I design something that won't fail?'",
      "Echo: 'Perfect! You're thinking like a true cloud architect now. High availability requires planning for failure at every level.'",
      ChallengeSpec::ChoiceSet {
        questions: vec![
          question(
            "Nova needs to distribute traffic across multiple EC2 instances. Which AWS service should she use?",
            "alb",
            vec![
              opt("cloudfront", "CloudFront", "CloudFront is a CDN for content delivery, not load balancing servers"),
              opt("alb", "Application Load Balancer (ALB)", "Perfect! ALB distributes HTTP/HTTPS traffic across multiple targets"),
              opt("route53", "Route 53", "Route 53 is DNS - it can route, but ALB is better for server load balancing"),
              opt("apigw", "API Gateway", "API Gateway manages APIs, it does not spread traffic over EC2 instances"),
            ],
          ),
          question(
            "Nova's app needs a managed database. Which RDS configuration is best for high availability?",
            "multi-az",
            vec![
              opt("single-az", "Single AZ deployment", "Single AZ provides no redundancy"),
              opt("multi-az", "Multi-AZ deployment with automated backups", "Excellent! Multi-AZ fails over automatically and backups protect data"),
              opt("replica", "Read replica only", "Read replicas help performance but don't fail over automatically"),
              opt("dynamodb", "DynamoDB instead of RDS", "The question asks about RDS specifically"),
            ],
          ),
          question(
            "What should Nova set up to get alerted when her instances have issues?",
            "alarms",
            vec![
              opt("manual", "Just check AWS Console manually", "Manual checking isn't scalable and delays response"),
              opt("cloudtrail", "Only use CloudTrail logs", "CloudTrail tracks API calls, not health metrics"),
              opt("alarms", "CloudWatch Alarms with SNS notifications", "Perfect! Automated monitoring with immediate notifications"),
              opt("scripts", "Set up custom scripts on each instance", "More complexity and maintenance than needed"),
            ],
          ),
        ],
      },
    ),
  ]
}

/// Level ids in catalog order. Handy for logs and tests.
pub fn seed_level_ids() -> Vec<String> {
  seed_levels().into_iter().map(|l| l.id).collect()
}
